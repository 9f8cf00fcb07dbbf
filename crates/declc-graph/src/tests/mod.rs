//! Unit tests for the type graph, declaration tree and resolver.


use crate::decl::{
    ClassDecl, DeclArena, DeclId, DeclKind, Declaration, FunctionDecl, VariableDecl,
};
use crate::deps::State;
use crate::intern::TypeInterner;
use crate::resolver::{ResolveError, ResolverOptions, Target, resolve_dependencies};
use crate::types::TypeId;
use smallvec::SmallVec;

pub(crate) fn class(arena: &mut DeclArena, types: &TypeInterner, name: &str) -> DeclId {
    arena.alloc(Declaration::new(
        types.intern_name(name),
        DeclKind::Class(ClassDecl::default()),
    ))
}

pub(crate) fn variable(
    arena: &mut DeclArena,
    types: &TypeInterner,
    name: &str,
    ty: TypeId,
) -> DeclId {
    arena.alloc(Declaration::new(
        types.intern_name(name),
        DeclKind::Variable(VariableDecl { ty }),
    ))
}

pub(crate) fn function(
    arena: &mut DeclArena,
    types: &TypeInterner,
    name: &str,
    ret: TypeId,
    params: &[(&str, TypeId)],
) -> DeclId {
    let params = params
        .iter()
        .map(|&(name, ty)| crate::decl::Param {
            name: types.intern_name(name),
            ty,
        })
        .collect::<SmallVec<_>>();
    arena.alloc(Declaration::new(
        types.intern_name(name),
        DeclKind::Function(FunctionDecl {
            ret,
            params,
            type_params: Vec::new(),
            constraint: None,
        }),
    ))
}

/// Attach a value member of type `ty` to `class`.
pub(crate) fn member_variable(
    arena: &mut DeclArena,
    types: &TypeInterner,
    class: DeclId,
    name: &str,
    ty: TypeId,
) -> DeclId {
    let member = variable(arena, types, name, ty);
    arena.add_child(class, member);
    member
}

/// Run the resolver and record every emit as `(decl, state)`.
pub(crate) fn collect_emits(
    arena: &DeclArena,
    types: &TypeInterner,
    targets: &[Target],
    options: ResolverOptions,
) -> Result<Vec<(DeclId, State)>, ResolveError> {
    let mut emits = Vec::new();
    resolve_dependencies(arena, types, targets, options, |target, state| {
        emits.push((target.decl, state));
        Ok(())
    })?;
    Ok(emits)
}

/// `ResolverOptions` with `ignore_errors` disabled.
pub(crate) fn strict() -> ResolverOptions {
    ResolverOptions {
        ignore_errors: false,
    }
}

/// Index of `(decl, state)` in the emit sequence; panics if absent.
pub(crate) fn emit_position(emits: &[(DeclId, State)], decl: DeclId, state: State) -> usize {
    emits
        .iter()
        .position(|&entry| entry == (decl, state))
        .unwrap_or_else(|| panic!("expected emit of {decl:?} at {state:?} in {emits:?}"))
}
