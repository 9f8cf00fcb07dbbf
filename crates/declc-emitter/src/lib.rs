//! C++ header emission for the declc header compiler.
//!
//! This crate provides:
//! - `SourceWriter` - indentation-aware output buffer
//! - `TypePrinter` - C++ rendering of interned type terms
//! - `DeclarationEmitter` - partial/complete rendering per declaration kind
//! - `HeaderEmitter` - the conventional emit callback wired to the resolver,
//!   with namespace blocks reopened as the output moves between namespaces

pub mod declarations;
pub mod header;
pub mod source_writer;
pub mod type_printer;

pub use declarations::{DeclarationEmitter, ResolverContext};
pub use header::HeaderEmitter;
pub use source_writer::SourceWriter;
pub use type_printer::TypePrinter;
