//! Type graph, declaration tree and dependency resolver for the declc
//! header compiler.
//!
//! The target language wants a single linear file where every declaration is
//! preceded by everything it transitively depends on, and it distinguishes
//! *partial* (forward) declarations from *complete* (definition) ones. This
//! crate provides:
//! - `TypeInterner` / `TypeKey` - a hash-consed graph of type terms
//! - `DeclArena` / `Declaration` - the tree of named entities
//! - `Dependencies` - per-declaration demand aggregation with max-merge
//! - `DependencyResolver` - the cycle-aware driver that lays declarations
//!   out in a valid linear order
//! - `Reason` - audit chains for cycle diagnostics

pub mod decl;
pub mod deps;
pub mod intern;
pub mod reason;
pub mod resolver;
pub mod types;

pub use decl::{
    ClassDecl, DeclArena, DeclFlags, DeclId, DeclKind, Declaration, FunctionDecl, Param,
    TypeAliasDecl, VariableDecl, Visibility,
};
pub use deps::{Dependencies, Dependency, ReasonKind, State};
pub use intern::TypeInterner;
pub use reason::Reason;
pub use resolver::{
    DependencyResolver, ResolveError, ResolverOptions, Target, remove_duplicates,
    resolve_dependencies, set_ignore_errors,
};
pub use types::{CompoundOp, Qualifier, TypeId, TypeKey};

#[cfg(test)]
mod tests;
