//! Common types and utilities for the declc header compiler.
//!
//! This crate provides the foundational pieces shared by all declc crates:
//! - String interning (`Atom`, `Interner`)

// String interning for name deduplication
pub mod interner;
pub use interner::{Atom, Interner};
