//! Serde document model for declaration descriptions.
//!
//! The document is a JSON rendition of the declaration tree: namespaces,
//! classes, functions, variables and type aliases, with structured type
//! expressions. It stands in for a source-syntax front-end, and maps
//! one-to-one onto the arena the driver builds.

use serde::Deserialize;

/// Top-level document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDoc {
    #[serde(default)]
    pub declarations: Vec<DeclDoc>,
}

/// One declaration.
///
/// No `deny_unknown_fields` here: the type doubles as the flatten target
/// inside [`MemberDoc`], which serde does not support in combination with
/// that attribute.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DeclDoc {
    Namespace {
        name: String,
        #[serde(default)]
        declarations: Vec<DeclDoc>,
    },
    Class {
        name: String,
        #[serde(default)]
        attributes: Vec<String>,
        #[serde(default)]
        type_params: Vec<String>,
        #[serde(default)]
        bases: Vec<TypeDoc>,
        #[serde(default)]
        constraint: Option<TypeDoc>,
        #[serde(default)]
        members: Vec<MemberDoc>,
    },
    Function {
        name: String,
        #[serde(default)]
        attributes: Vec<String>,
        #[serde(default)]
        type_params: Vec<String>,
        returns: TypeDoc,
        #[serde(default)]
        params: Vec<ParamDoc>,
        #[serde(default)]
        constraint: Option<TypeDoc>,
    },
    Variable {
        name: String,
        #[serde(rename = "type")]
        ty: TypeDoc,
        #[serde(default)]
        r#static: bool,
    },
    TypeAlias {
        name: String,
        #[serde(default)]
        type_params: Vec<String>,
        #[serde(rename = "type")]
        ty: TypeDoc,
    },
}

impl DeclDoc {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Namespace { name, .. }
            | Self::Class { name, .. }
            | Self::Function { name, .. }
            | Self::Variable { name, .. }
            | Self::TypeAlias { name, .. } => name,
        }
    }
}

/// A class member: a declaration plus its access control.
#[derive(Debug, Deserialize)]
pub struct MemberDoc {
    #[serde(default)]
    pub visibility: VisibilityDoc,
    #[serde(flatten)]
    pub decl: DeclDoc,
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityDoc {
    #[default]
    Public,
    Protected,
    Private,
}

/// A function parameter.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDoc,
}

/// A structured type expression.
///
/// `Ref` names a declared entity by its dotted path ("client.Object"); a
/// name that resolves to nothing degrades to a plain named type, the same
/// way the resolver treats referents from external headers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub enum TypeDoc {
    Named(String),
    Ref(String),
    Generic(String),
    Literal(String),
    Pointer(Box<TypeDoc>),
    Reference(Box<TypeDoc>),
    ConstPointer(Box<TypeDoc>),
    ConstReference(Box<TypeDoc>),
    Function {
        returns: Box<TypeDoc>,
        #[serde(default)]
        params: Vec<TypeDoc>,
    },
    Member {
        inner: Box<TypeDoc>,
        name: String,
    },
    AllOf(Vec<TypeDoc>),
    AnyOf(Vec<TypeDoc>),
}
