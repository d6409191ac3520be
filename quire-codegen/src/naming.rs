//! Identifier rules for generated Rust code.

use quire_core::{is_identifier, to_snake_case};

/// Keywords that cannot be used as plain identifiers.
const RESERVED_WORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "gen",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Keywords that are not allowed as raw identifiers either.
const NON_RAW: &[&str] = &["crate", "self", "Self", "super"];

/// Check if a name is a reserved word.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Get a safe identifier, escaping reserved words.
///
/// Most keywords become raw identifiers (`type` -> `r#type`); the few that
/// cannot be raw get a trailing underscore (`self` -> `self_`).
pub fn safe_name(name: &str) -> String {
    if NON_RAW.contains(&name) {
        format!("{name}_")
    } else if is_reserved(name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Transform a scope name into a module identifier.
pub fn module_name(name: &str) -> String {
    safe_name(&to_snake_case(name))
}

/// Per-writer source of hygienic local names.
///
/// Names are `prefix_<n>` where `n` starts at 1 and increases on every call,
/// whatever the prefix. Each writer owns its own generator, so names are
/// unique within one writer only.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    counter: u32,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next name for `prefix`.
    pub fn fresh(&mut self, prefix: &str) -> String {
        debug_assert!(is_identifier(prefix), "invalid name prefix `{prefix}`");
        self.counter += 1;
        format!("{}_{}", prefix, self.counter)
    }
}
