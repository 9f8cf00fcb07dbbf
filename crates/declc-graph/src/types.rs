//! Type terms and the per-variant dependency rules.
//!
//! Types form a DAG, not a tree: interning makes a constructor reachable from
//! any number of parents. The data here is deliberately small; the behavior
//! that matters lives in [`crate::intern::TypeInterner::type_dependencies`],
//! which answers the one question the resolver cares about: which
//! declarations must be available, and how completely, to mention this type.

use crate::decl::DeclId;
use declc_common::Atom;
use serde::Serialize;

/// Handle to an interned type term. Equal handles are the same term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Indirection applied by a qualified type.
///
/// Every qualifier in this set refers to its pointee through an indirection,
/// so mentioning the qualified type only ever needs the pointee's forward
/// declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Qualifier {
    Pointer,
    Reference,
    ConstPointer,
    ConstReference,
}

impl Qualifier {
    #[must_use]
    pub const fn is_const(self) -> bool {
        matches!(self, Self::ConstPointer | Self::ConstReference)
    }

    #[must_use]
    pub const fn is_pointer(self) -> bool {
        matches!(self, Self::Pointer | Self::ConstPointer)
    }
}

/// Connective of a compound constraint expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CompoundOp {
    /// Logical AND; the empty AND is always-true.
    And,
    /// Logical OR; the empty OR is always-false.
    Or,
}

/// A structurally interned type term.
///
/// Construction routes through [`crate::intern::TypeInterner`]; two
/// structurally equal terms are represented by the same [`TypeId`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKey {
    /// Terminal name emitted verbatim ("double", "unsigned int").
    Named(Atom),
    /// Reference to a declaration in the tree.
    Declared(DeclId),
    /// Pointer or reference indirection around an inner type.
    Qualified { qualifier: Qualifier, inner: TypeId },
    /// Function type: return type plus parameter types.
    Function { ret: TypeId, params: Vec<TypeId> },
    /// Boolean-valued constraint expression over type expressions.
    Compound { op: CompoundOp, operands: Vec<TypeId> },
    /// Dependent member of another type ("typename T::iterator").
    Member { inner: TypeId, name: Atom },
    /// Template parameter name ("_T0", "_Args").
    Generic(Atom),
    /// Free textual token spliced into constraint expressions.
    Literal(Atom),
}
