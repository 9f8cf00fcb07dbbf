//! The declaration tree: arena, kinds, flags and direct dependencies.
//!
//! Declarations form cycles through their type references, so the tree is an
//! arena of stable integer ids with parent links as non-owning
//! back-references. Resolution state is bookkeeping owned by the resolver
//! run, not by the declarations themselves.

use crate::deps::{Dependencies, Dependency, ReasonKind, State};
use crate::intern::TypeInterner;
use crate::types::TypeId;
use bitflags::bitflags;
use declc_common::{Atom, Interner};
use serde::Serialize;
use smallvec::SmallVec;

/// Stable identifier for a declaration in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId(pub(crate) u32);

impl DeclId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Storage-class flags attached to a declaration and consumed by the
    /// emitter.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct DeclFlags: u8 {
        const EXTERN = 1 << 0;
        const STATIC = 1 << 1;
    }
}

/// Access control for class members.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A function parameter.
#[derive(Clone, Debug)]
pub struct Param {
    pub name: Atom,
    pub ty: TypeId,
}

#[derive(Clone, Debug, Default)]
pub struct ClassDecl {
    pub bases: Vec<TypeId>,
    pub type_params: Vec<Atom>,
    pub constraint: Option<TypeId>,
}

#[derive(Clone, Debug)]
pub struct FunctionDecl {
    pub ret: TypeId,
    pub params: SmallVec<[Param; 4]>,
    pub type_params: Vec<Atom>,
    pub constraint: Option<TypeId>,
}

#[derive(Clone, Debug)]
pub struct VariableDecl {
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct TypeAliasDecl {
    pub ty: TypeId,
    pub type_params: Vec<Atom>,
}

/// Kind payload of a declaration.
#[derive(Clone, Debug)]
pub enum DeclKind {
    Namespace,
    Class(ClassDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
    TypeAlias(TypeAliasDecl),
}

/// A named entity in the declaration tree.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub name: Atom,
    pub parent: Option<DeclId>,
    pub flags: DeclFlags,
    pub visibility: Visibility,
    /// Raw attribute tokens, emitted verbatim inside `[[...]]`.
    pub attributes: Vec<Atom>,
    pub children: Vec<DeclId>,
    pub kind: DeclKind,
}

impl Declaration {
    #[must_use]
    pub fn new(name: Atom, kind: DeclKind) -> Self {
        Self {
            name,
            parent: None,
            flags: DeclFlags::empty(),
            visibility: Visibility::default(),
            attributes: Vec::new(),
            children: Vec::new(),
            kind,
        }
    }
}

/// Arena owning every declaration. Parent/child links are ids into it.
#[derive(Debug, Default)]
pub struct DeclArena {
    decls: Vec<Declaration>,
}

impl DeclArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    #[must_use]
    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.index()]
    }

    /// Attach `child` under `parent`, keeping both links consistent.
    pub fn add_child(&mut self, parent: DeclId, child: DeclId) {
        self.decls[child.index()].parent = Some(parent);
        self.decls[parent.index()].children.push(child);
    }

    pub fn add_flags(&mut self, id: DeclId, flags: DeclFlags) {
        self.decls[id.index()].flags |= flags;
    }

    pub fn add_attribute(&mut self, id: DeclId, attribute: Atom) {
        self.decls[id.index()].attributes.push(attribute);
    }

    /// Attach `member` under `class` with its access control.
    pub fn add_member(&mut self, class: DeclId, member: DeclId, visibility: Visibility) {
        self.decls[member.index()].visibility = visibility;
        self.add_child(class, member);
    }

    pub fn add_base(&mut self, id: DeclId, base: TypeId) {
        if let DeclKind::Class(class) = &mut self.decls[id.index()].kind {
            class.bases.push(base);
        }
    }

    #[must_use]
    pub fn name(&self, id: DeclId) -> Atom {
        self.get(id).name
    }

    #[must_use]
    pub fn parent(&self, id: DeclId) -> Option<DeclId> {
        self.get(id).parent
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.decls.len()).map(|index| DeclId(index as u32))
    }

    /// The highest completeness this kind of declaration can reach. A
    /// variable or function declaration is always just a declaration; a
    /// class, namespace or alias has a complete form.
    #[must_use]
    pub fn max_state(&self, id: DeclId) -> State {
        match self.get(id).kind {
            DeclKind::Namespace | DeclKind::Class(_) | DeclKind::TypeAlias(_) => State::Complete,
            DeclKind::Function(_) | DeclKind::Variable(_) => State::Partial,
        }
    }

    /// Stable key: identity integer plus parent chain.
    #[must_use]
    pub fn decl_key(&self, id: DeclId) -> String {
        let mut key = String::new();
        let mut current = Some(id);
        while let Some(decl) = current {
            key.push_str(&format!("{};", decl.index()));
            current = self.parent(decl);
        }
        key
    }

    /// `::`-separated display name for diagnostics.
    #[must_use]
    pub fn qualified_name(&self, atoms: &Interner, id: DeclId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(decl) = current {
            segments.push(atoms.resolve(self.name(decl)));
            current = self.parent(decl);
        }
        segments.reverse();
        segments
            .iter()
            .map(|segment| &**segment)
            .collect::<Vec<_>>()
            .join("::")
    }

    /// The demands this declaration places on other declarations when it is
    /// to be resolved at `state`.
    #[must_use]
    pub fn dependencies(&self, types: &TypeInterner, id: DeclId, state: State) -> Dependencies {
        let mut out = Dependencies::new();
        self.collect_dependencies(types, id, state, &mut out);
        out
    }

    fn collect_dependencies(
        &self,
        types: &TypeInterner,
        id: DeclId,
        state: State,
        out: &mut Dependencies,
    ) {
        let decl = self.get(id);
        match &decl.kind {
            DeclKind::Namespace => {}
            DeclKind::Class(class) => {
                if state == State::Complete {
                    // The definition is always preceded by the class's own
                    // forward declaration. This entry is also the lower-state
                    // re-entry that breaks pointer cycles.
                    out.add(id, Dependency::new(State::Partial, id, ReasonKind::Inner));
                    for &base in &class.bases {
                        types.type_dependencies(
                            base,
                            Dependency::new(State::Complete, id, ReasonKind::BaseClass),
                            out,
                        );
                    }
                    for &child in &decl.children {
                        // Members print inside the body, so their demands are
                        // due here. Nested classes only contribute a forward
                        // declaration to the body; their definitions follow
                        // out of line.
                        if !matches!(self.get(child).kind, DeclKind::Class(_)) {
                            self.collect_dependencies(types, child, State::Complete, out);
                        }
                    }
                }
                if let Some(constraint) = class.constraint {
                    types.type_dependencies(
                        constraint,
                        Dependency::new(State::Partial, id, ReasonKind::Constraint),
                        out,
                    );
                }
            }
            DeclKind::Function(function) => {
                types.type_dependencies(
                    function.ret,
                    Dependency::new(State::Partial, id, ReasonKind::ReturnType),
                    out,
                );
                for param in &function.params {
                    types.type_dependencies(
                        param.ty,
                        Dependency::new(State::Partial, id, ReasonKind::ParameterType),
                        out,
                    );
                }
                if let Some(constraint) = function.constraint {
                    types.type_dependencies(
                        constraint,
                        Dependency::new(State::Partial, id, ReasonKind::Constraint),
                        out,
                    );
                }
            }
            DeclKind::Variable(variable) => {
                types.type_dependencies(
                    variable.ty,
                    Dependency::new(state, id, ReasonKind::VariableType),
                    out,
                );
            }
            DeclKind::TypeAlias(alias) => {
                types.type_dependencies(
                    alias.ty,
                    Dependency::new(state, id, ReasonKind::TypeAliasType),
                    out,
                );
            }
        }
    }
}
