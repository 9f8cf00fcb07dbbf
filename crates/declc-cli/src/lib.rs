//! Command line interface for the declc header compiler.
//!
//! This crate provides the `declc` binary and its supporting modules:
//! argument parsing, the declaration document model, the compilation driver
//! and tracing setup.

pub mod args;
pub mod driver;
pub mod model;
pub mod tracing_config;

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod model_tests;
