//! Completeness states and dependency aggregation.

use crate::decl::DeclId;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

/// How much of a declaration must be visible at a use site.
///
/// `Partial` means the name and kind are visible (a forward declaration
/// suffices); `Complete` means the body and members are visible. The derived
/// order (`Partial < Complete`) is what the max-merge rule in
/// [`Dependencies`] and the resolver's cycle check build on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum State {
    Partial,
    Complete,
}

/// Why one declaration demands another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ReasonKind {
    BaseClass,
    VariableType,
    ReturnType,
    ParameterType,
    TypeAliasType,
    Constraint,
    Root,
    Inner,
    Member,
}

/// A single demand placed on a declaration: the completeness required, the
/// declaration whose signature placed it, and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub state: State,
    pub origin: DeclId,
    pub kind: ReasonKind,
}

impl Dependency {
    #[must_use]
    pub const fn new(state: State, origin: DeclId, kind: ReasonKind) -> Self {
        Self {
            state,
            origin,
            kind,
        }
    }

    /// The same demand at a different completeness.
    #[must_use]
    pub const fn with_state(self, state: State) -> Self {
        Self { state, ..self }
    }
}

/// Demands accumulated over all type references in a declaration's signature
/// and body.
///
/// Insertion order is preserved: the resolver visits dependencies in the
/// order they were discovered, which in turn fixes the sibling order of the
/// output. Adding a declaration that is already present keeps the entry with
/// the higher state, so a declaration needed at both Partial and Complete is
/// resolved to Complete.
#[derive(Debug, Default)]
pub struct Dependencies {
    map: IndexMap<DeclId, Dependency>,
}

impl Dependencies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Max-merge insert.
    pub fn add(&mut self, decl: DeclId, dep: Dependency) {
        match self.map.entry(decl) {
            Entry::Occupied(mut entry) => {
                if dep.state > entry.get().state {
                    entry.insert(dep);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(dep);
            }
        }
    }

    #[must_use]
    pub fn get(&self, decl: DeclId) -> Option<&Dependency> {
        self.map.get(&decl)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Dependency)> + '_ {
        self.map.iter().map(|(&decl, dep)| (decl, dep))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
