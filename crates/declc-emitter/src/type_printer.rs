//! C++ rendering of interned type terms.

use declc_graph::{CompoundOp, DeclArena, DeclId, DeclKind, Qualifier, TypeId, TypeInterner, TypeKey};

/// Renders type terms as C++ type syntax, qualifying declared names relative
/// to the namespace the output currently sits in.
pub struct TypePrinter<'a> {
    arena: &'a DeclArena,
    types: &'a TypeInterner,
}

impl<'a> TypePrinter<'a> {
    #[must_use]
    pub fn new(arena: &'a DeclArena, types: &'a TypeInterner) -> Self {
        Self { arena, types }
    }

    /// Render `ty` with `ns` as the enclosing namespace context.
    #[must_use]
    pub fn print(&self, ty: TypeId, ns: Option<DeclId>) -> String {
        match self.types.key(ty) {
            TypeKey::Named(name) | TypeKey::Generic(name) | TypeKey::Literal(name) => {
                self.types.atoms().resolve(name).to_string()
            }
            TypeKey::Declared(decl) => self.qualified_path(decl, ns),
            TypeKey::Qualified { qualifier, inner } => {
                let inner = self.print(inner, ns);
                match qualifier {
                    Qualifier::Pointer => format!("{inner}*"),
                    Qualifier::Reference => format!("{inner}&"),
                    Qualifier::ConstPointer => format!("const {inner}*"),
                    Qualifier::ConstReference => format!("const {inner}&"),
                }
            }
            TypeKey::Function { ret, params } => {
                let params = params
                    .iter()
                    .map(|&param| self.print(param, ns))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({params})", self.print(ret, ns))
            }
            TypeKey::Member { inner, name } => {
                format!(
                    "typename {}::{}",
                    self.print(inner, ns),
                    self.types.atoms().resolve(name)
                )
            }
            TypeKey::Compound { op, operands } => self.print_compound(op, &operands, ns),
        }
    }

    fn print_compound(&self, op: CompoundOp, operands: &[TypeId], ns: Option<DeclId>) -> String {
        match (op, operands) {
            // Algebraic identities of the empty connectives.
            (CompoundOp::And, []) => "true".to_string(),
            (CompoundOp::Or, []) => "false".to_string(),
            // A single operand writes without parentheses.
            (_, [only]) => self.print(*only, ns),
            _ => {
                let joiner = match op {
                    CompoundOp::And => " && ",
                    CompoundOp::Or => " || ",
                };
                operands
                    .iter()
                    .map(|&operand| {
                        let text = self.print(operand, ns);
                        // Same-kind nesting was flattened at intern time, so
                        // any compound operand here mixes connectives.
                        match self.types.key(operand) {
                            TypeKey::Compound { operands, .. } if operands.len() > 1 => {
                                format!("({text})")
                            }
                            _ => text,
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(joiner)
            }
        }
    }

    /// `::`-qualified path from the namespace context to `decl`. The chain
    /// shared with `ns` is dropped; anything below it (including enclosing
    /// classes) is spelled out.
    #[must_use]
    pub fn qualified_path(&self, decl: DeclId, ns: Option<DeclId>) -> String {
        let chain = self.ancestor_chain(decl);
        let ns_chain = ns.map_or_else(Vec::new, |ns| self.ancestor_chain(ns));
        let shared = chain
            .iter()
            .zip(&ns_chain)
            .take_while(|(a, b)| a == b)
            .count();
        chain[shared..]
            .iter()
            .map(|&id| self.types.atoms().resolve(self.arena.name(id)).to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    fn ancestor_chain(&self, decl: DeclId) -> Vec<DeclId> {
        let mut chain = Vec::new();
        let mut current = Some(decl);
        while let Some(id) = current {
            chain.push(id);
            current = self.arena.parent(id);
        }
        chain.reverse();
        chain
    }

    /// Whether `decl` sits inside a class (and is therefore spelled through
    /// its enclosing class when defined out of line).
    #[must_use]
    pub fn nested_in_class(&self, decl: DeclId) -> bool {
        self.arena
            .parent(decl)
            .is_some_and(|parent| matches!(self.arena.get(parent).kind, DeclKind::Class(_)))
    }
}
