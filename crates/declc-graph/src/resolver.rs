//! Cycle-aware dependency resolution.
//!
//! Given a set of targets (declaration plus desired completeness), the
//! resolver walks the dependency relation depth-first and invokes the emit
//! callback once per reached `(declaration, state)` pair, in an order where
//! every demand is satisfied before its demander. Re-entering a declaration
//! at a strictly lower state than the one on its pending stack is the
//! cycle-break that puts forward declarations ahead of definitions;
//! re-entering at the same or a higher state is an unresolvable cycle.

use crate::decl::{DeclArena, DeclId};
use crate::deps::{Dependency, ReasonKind, State};
use crate::intern::TypeInterner;
use crate::reason::Reason;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, trace};

/// A declaration plus the completeness the caller wants it to reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    pub decl: DeclId,
    pub state: State,
}

impl Target {
    #[must_use]
    pub const fn new(decl: DeclId, state: State) -> Self {
        Self { decl, state }
    }
}

static IGNORE_ERRORS: AtomicBool = AtomicBool::new(false);

/// Legacy process-wide switch consulted by `ResolverOptions::default()`.
/// Prefer threading a `ResolverOptions` value explicitly.
pub fn set_ignore_errors(ignore: bool) {
    IGNORE_ERRORS.store(ignore, Ordering::Relaxed);
}

/// Resolver configuration.
#[derive(Clone, Copy, Debug)]
pub struct ResolverOptions {
    /// When set, unresolvable demands are satisfied by emitting at the
    /// requested state anyway. The output may be broken; the mode exists to
    /// produce diagnostic listings for cycles.
    pub ignore_errors: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            ignore_errors: IGNORE_ERRORS.load(Ordering::Relaxed),
        }
    }
}

/// Failure surfaced by a resolution run.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A demand hit a declaration already being resolved at a state it
    /// cannot satisfy from inside the cycle. `reason` is the head of the
    /// chain that led there; `path` is the pre-rendered declaration path.
    #[error("unresolvable dependency cycle: {path}")]
    Cycle { path: String, reason: Reason },
    /// The emit callback failed.
    #[error("emit failed for `{decl}`: {message}")]
    Emitter { decl: String, message: String },
}

/// Filter `targets` so each declaration appears at most once; the first
/// occurrence wins. Keys include the parent chain, so distinct declarations
/// that happen to share a name stay distinct.
#[must_use]
pub fn remove_duplicates(arena: &DeclArena, targets: Vec<Target>) -> Vec<Target> {
    let mut seen = FxHashSet::default();
    targets
        .into_iter()
        .filter(|target| seen.insert(arena.decl_key(target.decl)))
        .collect()
}

/// Resolve `targets` against `arena`, invoking `emit` once per reached
/// `(declaration, state)` pair in dependency order.
pub fn resolve_dependencies<F>(
    arena: &DeclArena,
    types: &TypeInterner,
    targets: &[Target],
    options: ResolverOptions,
    emit: F,
) -> Result<(), ResolveError>
where
    F: FnMut(Target, State) -> Result<(), ResolveError>,
{
    DependencyResolver::new(arena, types, targets, options, emit).run()
}

/// The stateful driver behind [`resolve_dependencies`].
pub struct DependencyResolver<'a, F> {
    arena: &'a DeclArena,
    types: &'a TypeInterner,
    options: ResolverOptions,
    emit: F,
    roots: Vec<Target>,
    targets: FxHashMap<DeclId, Target>,
    /// States currently being resolved, per declaration, innermost last.
    pending: FxHashMap<DeclId, Vec<State>>,
    /// Monotone resolved state per declaration.
    resolved: FxHashMap<DeclId, State>,
}

impl<'a, F> DependencyResolver<'a, F>
where
    F: FnMut(Target, State) -> Result<(), ResolveError>,
{
    pub fn new(
        arena: &'a DeclArena,
        types: &'a TypeInterner,
        targets: &[Target],
        options: ResolverOptions,
        emit: F,
    ) -> Self {
        let map = targets
            .iter()
            .map(|&target| (target.decl, target))
            .collect();
        Self {
            arena,
            types,
            options,
            emit,
            roots: targets.to_vec(),
            targets: map,
            pending: FxHashMap::default(),
            resolved: FxHashMap::default(),
        }
    }

    pub fn run(&mut self) -> Result<(), ResolveError> {
        let roots = self.roots.clone();
        for root in roots {
            self.resolve(root.decl, root.state, ReasonKind::Root, None)?;
        }
        Ok(())
    }

    fn is_resolved(&self, decl: DeclId, state: State) -> bool {
        self.resolved
            .get(&decl)
            .is_some_and(|&reached| reached >= state)
    }

    fn set_state(&mut self, decl: DeclId, state: State) {
        let entry = self.resolved.entry(decl).or_insert(state);
        if state > *entry {
            *entry = state;
        }
    }

    fn resolve(
        &mut self,
        decl: DeclId,
        state: State,
        kind: ReasonKind,
        parent_reason: Option<&Reason>,
    ) -> Result<(), ResolveError> {
        let reason = match parent_reason {
            Some(parent) => parent.push(decl, state, kind),
            None => Reason::new(decl, state, kind),
        };

        // Containment: a nested declaration can only be emitted once its
        // enclosing declaration's Complete form is underway. If the parent
        // already has a frame on the pending stack, that is exactly the
        // situation this rule exists to establish.
        if let Some(parent) = self.arena.parent(decl)
            && self.targets.contains_key(&parent)
            && self.pending.get(&parent).is_none_or(|stack| stack.is_empty())
        {
            self.resolve(parent, State::Complete, ReasonKind::Inner, Some(&reason))?;
        }

        if self.is_resolved(decl, state) {
            return Ok(());
        }

        if let Some(&top) = self.pending.get(&decl).and_then(|stack| stack.last()) {
            if state >= top {
                if self.options.ignore_errors {
                    debug!(decl = decl.index(), "cycle absorbed, emitting anyway");
                    return self.emit_now(decl, state);
                }
                return Err(self.cycle_error(reason));
            }
            // A strictly lower re-entry is permitted: this is how a forward
            // declaration gets emitted while the definition is in flight.
        }

        self.pending.entry(decl).or_default().push(state);
        let result = self.resolve_pushed(decl, state, &reason);
        if let Some(stack) = self.pending.get_mut(&decl) {
            stack.pop();
        }
        result
    }

    fn resolve_pushed(
        &mut self,
        decl: DeclId,
        state: State,
        reason: &Reason,
    ) -> Result<(), ResolveError> {
        trace!(decl = decl.index(), ?state, "resolving");
        let dependencies = self.arena.dependencies(self.types, decl, state);
        for (dep_decl, &dep) in dependencies.iter() {
            self.resolve_demand(dep_decl, dep, reason)?;
        }

        if self.is_resolved(decl, state) {
            return Ok(());
        }
        self.emit_now(decl, state)?;

        if state == State::Complete {
            // Nested declarations resolve whenever their container reaches
            // Complete; their own emissions follow the container's.
            let children = self.arena.get(decl).children.clone();
            for child in children {
                if let Some(&target) = self.targets.get(&child) {
                    self.resolve(child, target.state, ReasonKind::Inner, Some(reason))?;
                }
            }
        }
        Ok(())
    }

    /// Resolve one demand, walking up the parent chain of a non-target
    /// referent and promoting the required state to Complete at each hop,
    /// until a target is found or the root is passed.
    fn resolve_demand(
        &mut self,
        dep_decl: DeclId,
        dep: Dependency,
        reason: &Reason,
    ) -> Result<(), ResolveError> {
        let mut current = dep_decl;
        let mut state = dep.state;
        loop {
            if self.targets.contains_key(&current) {
                if current == dep_decl {
                    return self.resolve(current, state, dep.kind, Some(reason));
                }
                // Attribute the promoted demand to the inner declaration the
                // signature actually referenced.
                let inner = reason.push(dep_decl, dep.state, dep.kind);
                return self.resolve(current, state, ReasonKind::Member, Some(&inner));
            }
            match self.arena.parent(current) {
                Some(parent) => {
                    current = parent;
                    state = State::Complete;
                }
                None => {
                    // Not a target anywhere up the chain: the referent is
                    // assumed to come from an external header.
                    trace!(decl = dep_decl.index(), "demand on non-target, skipped");
                    return Ok(());
                }
            }
        }
    }

    fn emit_now(&mut self, decl: DeclId, state: State) -> Result<(), ResolveError> {
        let target = self
            .targets
            .get(&decl)
            .copied()
            .unwrap_or(Target::new(decl, state));
        debug!(
            decl = %self.arena.qualified_name(self.types.atoms(), decl),
            ?state,
            "emit"
        );
        (self.emit)(target, state)?;
        self.set_state(decl, state);
        Ok(())
    }

    fn cycle_error(&self, reason: Reason) -> ResolveError {
        let atoms = self.types.atoms();
        let path = reason
            .path()
            .iter()
            .map(|&decl| self.arena.qualified_name(atoms, decl))
            .collect::<Vec<_>>()
            .join(" -> ");
        ResolveError::Cycle { path, reason }
    }
}
