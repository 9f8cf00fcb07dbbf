//! Hash-consing registry for type terms.
//!
//! Every type is keyed by a structural string fingerprint built from its
//! variant tag and child keys (`D<id>`, `N<name>;`, `f<ret><ps...>;`, ...).
//! Two terms with equal fingerprints are the same `TypeId`; the registry is
//! append-only and entries live for the process.

use crate::decl::DeclId;
use crate::deps::{Dependencies, Dependency, State};
use crate::types::{CompoundOp, Qualifier, TypeId, TypeKey};
use dashmap::DashMap;
use declc_common::{Atom, Interner};
use std::sync::RwLock;
use tracing::trace;

struct TypeEntry {
    key: TypeKey,
    fingerprint: String,
}

/// The process-scoped type registry.
///
/// Owns the string interner its atoms come from, so a single `TypeInterner`
/// is the one identity authority for both names and type terms.
pub struct TypeInterner {
    atoms: Interner,
    entries: RwLock<Vec<TypeEntry>>,
    table: DashMap<String, TypeId>,
}

impl TypeInterner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            atoms: Interner::new(),
            entries: RwLock::new(Vec::new()),
            table: DashMap::new(),
        }
    }

    #[must_use]
    pub fn atoms(&self) -> &Interner {
        &self.atoms
    }

    /// Intern a bare string, for names held outside the type graph.
    pub fn intern_name(&self, text: &str) -> Atom {
        self.atoms.intern(text)
    }

    fn intern(&self, fingerprint: String, key: TypeKey) -> TypeId {
        if let Some(existing) = self.table.get(&fingerprint) {
            return *existing;
        }
        *self.table.entry(fingerprint.clone()).or_insert_with(|| {
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            let id = TypeId(entries.len() as u32);
            trace!(fingerprint = %fingerprint, id = id.index(), "intern type");
            entries.push(TypeEntry { key, fingerprint });
            id
        })
    }

    /// A terminal name, emitted verbatim.
    pub fn named(&self, name: &str) -> TypeId {
        let atom = self.atoms.intern(name);
        self.intern(format!("N{name};"), TypeKey::Named(atom))
    }

    /// A template parameter name.
    pub fn generic(&self, name: &str) -> TypeId {
        let atom = self.atoms.intern(name);
        self.intern(format!("G{name};"), TypeKey::Generic(atom))
    }

    /// A free textual token.
    pub fn literal(&self, token: &str) -> TypeId {
        let atom = self.atoms.intern(token);
        self.intern(format!("L{token};"), TypeKey::Literal(atom))
    }

    /// A reference to a declaration in the tree.
    pub fn declared(&self, decl: DeclId) -> TypeId {
        self.intern(format!("D{}", decl.index()), TypeKey::Declared(decl))
    }

    /// A pointer or reference around `inner`.
    pub fn qualified(&self, qualifier: Qualifier, inner: TypeId) -> TypeId {
        let tag = match qualifier {
            Qualifier::Pointer => 'p',
            Qualifier::Reference => 'r',
            Qualifier::ConstPointer => 'P',
            Qualifier::ConstReference => 'R',
        };
        let fingerprint = format!("Q{tag}{};", self.fingerprint(inner));
        self.intern(fingerprint, TypeKey::Qualified { qualifier, inner })
    }

    /// A function type from its return and parameter types.
    pub fn function(&self, ret: TypeId, params: &[TypeId]) -> TypeId {
        let mut fingerprint = format!("f{}", self.fingerprint(ret));
        for &param in params {
            fingerprint.push_str(&self.fingerprint(param));
        }
        fingerprint.push(';');
        self.intern(
            fingerprint,
            TypeKey::Function {
                ret,
                params: params.to_vec(),
            },
        )
    }

    /// A dependent member of `inner`.
    pub fn member(&self, inner: TypeId, name: &str) -> TypeId {
        let atom = self.atoms.intern(name);
        let fingerprint = format!("Y{}{name};", self.fingerprint(inner));
        self.intern(fingerprint, TypeKey::Member { inner, name: atom })
    }

    /// A compound constraint expression. Same-kind nesting is flattened, so
    /// `combine(And, [a, And(b, c)])` and `combine(And, [a, b, c])` are the
    /// same term.
    pub fn compound(&self, op: CompoundOp, operands: &[TypeId]) -> TypeId {
        let mut flat = Vec::with_capacity(operands.len());
        for &operand in operands {
            match self.key(operand) {
                TypeKey::Compound {
                    op: inner_op,
                    operands: inner,
                } if inner_op == op => flat.extend(inner),
                _ => flat.push(operand),
            }
        }
        let tag = match op {
            CompoundOp::And => '&',
            CompoundOp::Or => '|',
        };
        let mut fingerprint = String::from(tag);
        for &operand in &flat {
            fingerprint.push_str(&self.fingerprint(operand));
        }
        fingerprint.push(';');
        self.intern(fingerprint, TypeKey::Compound { op, operands: flat })
    }

    /// The structural key behind `id`.
    #[must_use]
    pub fn key(&self, id: TypeId) -> TypeKey {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries[id.index()].key.clone()
    }

    /// The structural fingerprint behind `id`.
    #[must_use]
    pub fn fingerprint(&self, id: TypeId) -> String {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries[id.index()].fingerprint.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The declarations required to mention `ty` under the demand `dep`.
    ///
    /// This is the engine of resolution. Indirections weaken the demand to
    /// Partial, member access strengthens it to Complete, function types
    /// weaken both sides to Partial (signatures carry pointers, not bodies),
    /// and a declared type reifies the demand against its declaration.
    pub fn type_dependencies(&self, ty: TypeId, dep: Dependency, out: &mut Dependencies) {
        match self.key(ty) {
            TypeKey::Named(_) | TypeKey::Generic(_) | TypeKey::Literal(_) => {}
            TypeKey::Declared(decl) => out.add(decl, dep),
            TypeKey::Qualified { inner, .. } => {
                self.type_dependencies(inner, dep.with_state(State::Partial), out);
            }
            TypeKey::Function { ret, params } => {
                self.type_dependencies(ret, dep.with_state(State::Partial), out);
                for param in params {
                    self.type_dependencies(param, dep.with_state(State::Partial), out);
                }
            }
            TypeKey::Member { inner, .. } => {
                self.type_dependencies(inner, dep.with_state(State::Complete), out);
            }
            TypeKey::Compound { operands, .. } => {
                for operand in operands {
                    self.type_dependencies(operand, dep, out);
                }
            }
        }
    }

    /// Flattened, non-deduplicated enumeration of `ty` and all its sub-terms.
    pub fn referenced_types(&self, ty: TypeId, out: &mut Vec<TypeId>) {
        out.push(ty);
        match self.key(ty) {
            TypeKey::Named(_)
            | TypeKey::Generic(_)
            | TypeKey::Literal(_)
            | TypeKey::Declared(_) => {}
            TypeKey::Qualified { inner, .. } | TypeKey::Member { inner, .. } => {
                self.referenced_types(inner, out);
            }
            TypeKey::Function { ret, params } => {
                self.referenced_types(ret, out);
                for param in params {
                    self.referenced_types(param, out);
                }
            }
            TypeKey::Compound { operands, .. } => {
                for operand in operands {
                    self.referenced_types(operand, out);
                }
            }
        }
    }

    /// Whether a constraint expression is trivially satisfied.
    ///
    /// The ellipsis token counts as always-true. That looks surprising but
    /// matches how variadic constraint positions behave downstream; keep it.
    #[must_use]
    pub fn is_always_true(&self, ty: TypeId) -> bool {
        match self.key(ty) {
            TypeKey::Compound {
                op: CompoundOp::And,
                operands,
            } => operands.iter().all(|&operand| self.is_always_true(operand)),
            TypeKey::Compound {
                op: CompoundOp::Or,
                operands,
            } => operands.iter().any(|&operand| self.is_always_true(operand)),
            TypeKey::Literal(token) => &*self.atoms.resolve(token) == "...",
            _ => false,
        }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}
