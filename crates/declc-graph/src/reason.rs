//! Audit chains recording why the resolver visited a declaration.
//!
//! A `Reason` is an immutable head-linked list of frames. The resolver pushes
//! one frame per recursion step; when an unresolvable cycle is found the head
//! reason travels with the error so callers can print the dependency path
//! that led there.

use crate::decl::DeclId;
use crate::deps::{ReasonKind, State};
use std::sync::Arc;

#[derive(Debug)]
struct Frame {
    decl: DeclId,
    state: State,
    kind: ReasonKind,
    next: Option<Arc<Frame>>,
}

/// An immutable chain of `(declaration, state, kind)` frames, head first.
#[derive(Clone, Debug)]
pub struct Reason {
    head: Arc<Frame>,
}

impl Reason {
    /// Start a new chain with a single frame.
    #[must_use]
    pub fn new(decl: DeclId, state: State, kind: ReasonKind) -> Self {
        Self {
            head: Arc::new(Frame {
                decl,
                state,
                kind,
                next: None,
            }),
        }
    }

    /// A new chain whose head frame links back to `self`.
    #[must_use]
    pub fn push(&self, decl: DeclId, state: State, kind: ReasonKind) -> Self {
        Self {
            head: Arc::new(Frame {
                decl,
                state,
                kind,
                next: Some(Arc::clone(&self.head)),
            }),
        }
    }

    #[must_use]
    pub fn decl(&self) -> DeclId {
        self.head.decl
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.head.state
    }

    #[must_use]
    pub fn kind(&self) -> ReasonKind {
        self.head.kind
    }

    /// Frames from the head (most recent demand) back to the root.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, State, ReasonKind)> + '_ {
        let mut next = Some(&self.head);
        std::iter::from_fn(move || {
            let frame = next?;
            next = frame.next.as_ref();
            Some((frame.decl, frame.state, frame.kind))
        })
    }

    /// Declarations along the chain, root first.
    #[must_use]
    pub fn path(&self) -> Vec<DeclId> {
        let mut path: Vec<DeclId> = self.iter().map(|(decl, _, _)| decl).collect();
        path.reverse();
        path
    }
}
