//! Templated source writer for Rust code generators.
//!
//! A [`Writer`] accumulates one unit of generated code. Text goes in through
//! block primitives, literal lines and `#{name:T}` templates; every type a
//! template renders is recorded in the writer's [`ImportSet`], so the rendered
//! file carries exactly the `use` lines its body needs.
//!
//! # Module Organization
//!
//! - [`builder`] - Indentation-aware text buffer
//! - [`writer`] - The writer, its blocks and context frames
//! - [`template`] - Placeholder syntax and escaping
//! - [`format`] - Formatter tags and the values they render
//! - [`imports`] - `use` lines and Cargo dependencies
//! - [`scope`] - Inline modules written by sub-writers
//! - [`helpers`] - Option unwrapping and collection iteration
//! - [`docs`] - Doc comments
//! - [`file`] - Flushing writers to disk

pub mod builder;
pub mod config;
pub mod context;
pub mod docs;
pub mod error;
pub mod file;
pub mod format;
pub mod helpers;
pub mod imports;
pub mod naming;
pub mod scope;
pub mod template;
pub mod types;
pub mod writer;

pub use builder::Indent;
pub use config::{FileKind, WriterConfig};
pub use error::{Error, Result};
pub use file::SourceFile;
pub use format::{Arg, FormatterRegistry};
pub use imports::{CargoDependency, ImportSet};
pub use scope::ModuleWriter;
pub use types::{RuntimeType, RustType, Symbol, Visibility};
pub use writer::{StateGuard, Writer};
