//! Core utilities for the quire source writer.
//!
//! This crate provides identifier helpers and the file flushing layer used
//! by `quire-codegen`.

mod file;
mod utils;

// File operations
pub use file::{File, FileRules, GeneratedFile, Overwrite, WriteResult};
// String utilities
pub use utils::{is_identifier, to_snake_case};
