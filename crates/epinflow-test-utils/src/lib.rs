//! # epinflow-test-utils
//!
//! Pre-built EPIN line fixtures for tests: full-width 168-character
//! record lines assembled from a handful of interesting field values.

pub mod fixtures;

pub use fixtures::*;
