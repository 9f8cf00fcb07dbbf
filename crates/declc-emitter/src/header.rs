//! End-to-end header generation.
//!
//! Wires the conventional emit callback to the resolver: forward declaration
//! at Partial, definition at Complete, with namespace blocks closed and
//! reopened as the emitted declaration's enclosing namespace changes.

use crate::declarations::{DeclarationEmitter, ResolverContext};
use declc_graph::{
    DeclArena, DeclId, DeclKind, ResolveError, ResolverOptions, Target, TypeInterner,
    resolve_dependencies,
};

/// Produces a complete header from a target list.
pub struct HeaderEmitter<'a> {
    arena: &'a DeclArena,
    types: &'a TypeInterner,
}

impl<'a> HeaderEmitter<'a> {
    #[must_use]
    pub fn new(arena: &'a DeclArena, types: &'a TypeInterner) -> Self {
        Self { arena, types }
    }

    /// Resolve `targets` and render every emission into one linear header.
    pub fn emit_header(
        &self,
        targets: &[Target],
        options: ResolverOptions,
    ) -> Result<String, ResolveError> {
        let arena = self.arena;
        let types = self.types;
        let mut emitter = DeclarationEmitter::new(arena, types);
        let mut open: Vec<DeclId> = Vec::new();

        resolve_dependencies(arena, types, targets, options, |target, state| {
            if !emitter.writes_output(target.decl, state) {
                return Ok(());
            }
            let chain = namespace_chain(arena, target.decl);
            let shared = open
                .iter()
                .zip(&chain)
                .take_while(|(a, b)| a == b)
                .count();
            while open.len() > shared {
                open.pop();
                emitter.writer().dedent();
                emitter.writer().write_line("}");
            }
            for &ns in &chain[shared..] {
                let name = types.atoms().resolve(arena.name(ns));
                emitter.writer().write_line(&format!("namespace {name} {{"));
                emitter.writer().indent();
                open.push(ns);
            }
            let ctx = ResolverContext::new(state);
            emitter.emit(&ctx, target.decl, open.last().copied());
            Ok(())
        })?;

        while open.pop().is_some() {
            emitter.writer().dedent();
            emitter.writer().write_line("}");
        }
        Ok(emitter.finish())
    }
}

/// The namespace ancestors of `decl`, outermost first.
fn namespace_chain(arena: &DeclArena, decl: DeclId) -> Vec<DeclId> {
    let mut chain = Vec::new();
    let mut current = arena.parent(decl);
    while let Some(id) = current {
        if matches!(arena.get(id).kind, DeclKind::Namespace) {
            chain.push(id);
        }
        current = arena.parent(id);
    }
    chain.reverse();
    chain
}
