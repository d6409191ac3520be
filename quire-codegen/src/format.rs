//! Template values and the formatters that render them.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    error::{Error, Result},
    imports::ImportSet,
    types::{RuntimeType, Symbol},
};

/// A value bound to a template placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A model symbol.
    Symbol(Symbol),
    /// An item from a support crate.
    RuntimeType(RuntimeType),
    /// Plain text.
    Str(String),
}

impl Arg {
    /// Human-readable kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Symbol(_) => "symbol",
            Self::RuntimeType(_) => "runtime type",
            Self::Str(_) => "string",
        }
    }

    /// Formatter tag used when a placeholder does not name one.
    pub fn default_tag(&self) -> char {
        match self {
            Self::Symbol(_) | Self::RuntimeType(_) => 'T',
            Self::Str(_) => 'L',
        }
    }
}

impl From<Symbol> for Arg {
    fn from(symbol: Symbol) -> Self {
        Self::Symbol(symbol)
    }
}

impl From<&Symbol> for Arg {
    fn from(symbol: &Symbol) -> Self {
        Self::Symbol(symbol.clone())
    }
}

impl From<RuntimeType> for Arg {
    fn from(rt: RuntimeType) -> Self {
        Self::RuntimeType(rt)
    }
}

impl From<&RuntimeType> for Arg {
    fn from(rt: &RuntimeType) -> Self {
        Self::RuntimeType(rt.clone())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// State a formatter may read or update while rendering one placeholder.
pub struct FormatContext<'a> {
    /// Indentation of the line being written.
    pub indent: &'a str,
    /// Namespace of the writer; types from it need no import.
    pub namespace: &'a str,
    /// Imports the writer already holds.
    pub existing: &'a ImportSet,
    /// Imports registered while resolving the current template.
    ///
    /// The writer takes these over only when the whole template resolves.
    pub imports: &'a mut ImportSet,
}

impl FormatContext<'_> {
    /// Check whether importing `name` from `module` would shadow an import of
    /// the same name from another module.
    pub fn clashes(&self, module: &str, name: &str) -> bool {
        self.existing.clashes(module, name) || self.imports.clashes(module, name)
    }
}

/// Renders a value, or returns `None` when it does not accept the value's kind.
pub type Formatter = fn(&Arg, &mut FormatContext<'_>) -> Option<String>;

/// Formatters keyed by their one-character tag.
///
/// # Example
///
/// ```
/// use quire_codegen::format::{Arg, FormatterRegistry};
///
/// let mut registry = FormatterRegistry::rust();
/// registry
///     .register('U', |arg, _| match arg {
///         Arg::Str(s) => Some(s.to_uppercase()),
///         _ => None,
///     })
///     .unwrap();
///
/// assert!(registry.register('T', |_, _| None).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormatterRegistry {
    formatters: BTreeMap<char, Formatter>,
}

impl FormatterRegistry {
    /// Create a registry without any formatters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard Rust formatters.
    ///
    /// | tag | renders |
    /// |-----|---------|
    /// | `T` | short type name, importing it |
    /// | `Q` | fully qualified type name |
    /// | `D` | crate name of a dependency |
    /// | `L` | any value as literal text |
    /// | `S` | a string as a quoted literal |
    pub fn rust() -> Self {
        let formatters: BTreeMap<char, Formatter> = BTreeMap::from([
            ('T', format_type as Formatter),
            ('Q', format_qualified as Formatter),
            ('D', format_dependency as Formatter),
            ('L', format_literal as Formatter),
            ('S', format_string as Formatter),
        ]);
        Self { formatters }
    }

    /// Register a formatter.
    ///
    /// Registering the same tag twice is a configuration error.
    pub fn register(&mut self, tag: char, formatter: Formatter) -> Result<&mut Self> {
        if self.formatters.contains_key(&tag) {
            return Err(Box::new(Error::DuplicateFormatter { tag }));
        }
        debug!(%tag, "formatter registered");
        self.formatters.insert(tag, formatter);
        Ok(self)
    }

    pub fn get(&self, tag: char) -> Option<Formatter> {
        self.formatters.get(&tag).copied()
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = char> + '_ {
        self.formatters.keys().copied()
    }
}

fn format_type(arg: &Arg, cx: &mut FormatContext<'_>) -> Option<String> {
    match arg {
        Arg::Symbol(symbol) => {
            let pairs = symbol.rust_type().imports();
            let clashing: Vec<_> = pairs
                .iter()
                .filter(|(module, name)| cx.clashes(module, name))
                .cloned()
                .collect();
            for pair in pairs {
                if pair.0 != cx.namespace && !clashing.contains(&pair) {
                    let (module, name) = pair;
                    cx.imports.add_import(module, name);
                }
            }
            for dependency in symbol.dependencies() {
                cx.imports.add_dependency(dependency.clone());
            }
            if clashing.is_empty() {
                return Some(symbol.name());
            }
            debug!(ty = %symbol.full_name(), "ambiguous short name, qualifying");
            Some(symbol.rust_type().name_qualifying(|module, name| {
                clashing.iter().any(|(m, n)| m == module && n == name)
            }))
        }
        Arg::RuntimeType(rt) => {
            if let Some(dependency) = rt.dependency() {
                cx.imports.add_dependency(dependency.clone());
            }
            if rt.namespace().is_empty() || rt.namespace() == cx.namespace {
                return Some(rt.name().to_string());
            }
            if cx.clashes(rt.namespace(), rt.name()) {
                debug!(ty = %rt.full_name(), "ambiguous short name, qualifying");
                return Some(rt.full_name());
            }
            cx.imports.add_import(rt.namespace(), rt.name());
            Some(rt.name().to_string())
        }
        Arg::Str(_) => None,
    }
}

fn format_qualified(arg: &Arg, cx: &mut FormatContext<'_>) -> Option<String> {
    match arg {
        Arg::Symbol(symbol) => {
            for dependency in symbol.dependencies() {
                cx.imports.add_dependency(dependency.clone());
            }
            Some(symbol.full_name())
        }
        Arg::RuntimeType(rt) => {
            if let Some(dependency) = rt.dependency() {
                cx.imports.add_dependency(dependency.clone());
            }
            Some(rt.full_name())
        }
        Arg::Str(_) => None,
    }
}

fn format_dependency(arg: &Arg, cx: &mut FormatContext<'_>) -> Option<String> {
    let dependency = match arg {
        Arg::Symbol(symbol) => symbol.dependencies().first(),
        Arg::RuntimeType(rt) => rt.dependency(),
        Arg::Str(_) => None,
    }?;
    cx.imports.add_dependency(dependency.clone());
    Some(dependency.crate_name())
}

fn format_literal(arg: &Arg, _: &mut FormatContext<'_>) -> Option<String> {
    Some(match arg {
        Arg::Symbol(symbol) => symbol.name(),
        Arg::RuntimeType(rt) => rt.name().to_string(),
        Arg::Str(s) => s.clone(),
    })
}

fn format_string(arg: &Arg, _: &mut FormatContext<'_>) -> Option<String> {
    match arg {
        Arg::Str(s) => Some(format!("{s:?}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{imports::CargoDependency, types::RustType};

    fn render(tag: char, arg: &Arg, imports: &mut ImportSet) -> Option<String> {
        render_with(tag, arg, &ImportSet::new(), imports)
    }

    fn render_with(
        tag: char,
        arg: &Arg,
        existing: &ImportSet,
        imports: &mut ImportSet,
    ) -> Option<String> {
        let formatter = FormatterRegistry::rust().get(tag).unwrap();
        let mut cx = FormatContext {
            indent: "",
            namespace: "crate::ops",
            existing,
            imports,
        };
        formatter(arg, &mut cx)
    }

    #[test]
    fn test_default_tags() {
        let symbol = Symbol::new(RustType::string());
        assert_eq!(Arg::from(symbol).default_tag(), 'T');
        assert_eq!(Arg::from(RuntimeType::from_path("bytes::Bytes")).default_tag(), 'T');
        assert_eq!(Arg::from("x").default_tag(), 'L');
    }

    #[test]
    fn test_type_formatter_registers_imports() {
        let mut imports = ImportSet::new();
        let symbol = Symbol::new(RustType::vec(RustType::named("crate::model", "Shape")));

        let out = render('T', &Arg::from(symbol), &mut imports);

        assert_eq!(out.as_deref(), Some("Vec<Shape>"));
        assert!(imports.has_symbol("crate::model", "Shape"));
    }

    #[test]
    fn test_type_formatter_skips_own_namespace() {
        let mut imports = ImportSet::new();
        let symbol = Symbol::new(RustType::named("crate::ops", "Input"));

        render('T', &Arg::from(symbol), &mut imports);

        assert!(imports.has_no_local_imports());
    }

    #[test]
    fn test_clashing_short_name_is_qualified() {
        let mut existing = ImportSet::new();
        existing.add_import("crate::a", "Error");
        let mut imports = ImportSet::new();

        let other = Symbol::new(RustType::option(RustType::named("crate::b", "Error")));
        let out = render_with('T', &Arg::from(other), &existing, &mut imports);
        assert_eq!(out.as_deref(), Some("Option<crate::b::Error>"));
        assert!(imports.has_no_local_imports());

        let same = Symbol::new(RustType::named("crate::a", "Error"));
        let out = render_with('T', &Arg::from(same), &existing, &mut imports);
        assert_eq!(out.as_deref(), Some("Error"));
    }

    #[test]
    fn test_clash_within_one_template() {
        let mut imports = ImportSet::new();
        let first = RuntimeType::from_path("std::fmt::Error");
        let second = RuntimeType::from_path("std::io::Error");

        assert_eq!(render('T', &Arg::from(first), &mut imports).as_deref(), Some("Error"));
        assert_eq!(
            render('T', &Arg::from(second), &mut imports).as_deref(),
            Some("std::io::Error")
        );
        assert_eq!(imports.render(), "use std::fmt::Error;");
    }

    #[test]
    fn test_runtime_type_registers_dependency() {
        let mut imports = ImportSet::new();
        let rt = RuntimeType::from_path("bytes::Bytes")
            .with_dependency(CargoDependency::new("bytes", "1"));

        assert_eq!(render('T', &Arg::from(&rt), &mut imports).as_deref(), Some("Bytes"));
        assert!(imports.has_symbol("bytes", "Bytes"));
        assert!(imports.has_dependency("bytes"));
    }

    #[test]
    fn test_qualified_formatter_does_not_import() {
        let mut imports = ImportSet::new();
        let rt = RuntimeType::from_path("bytes::Bytes")
            .with_dependency(CargoDependency::new("bytes", "1"));

        let out = render('Q', &Arg::from(rt), &mut imports);

        assert_eq!(out.as_deref(), Some("bytes::Bytes"));
        assert!(imports.has_no_local_imports());
        assert!(imports.has_dependency("bytes"));
    }

    #[test]
    fn test_dependency_formatter() {
        let mut imports = ImportSet::new();
        let rt = RuntimeType::from_path("serde_json::Value")
            .with_dependency(CargoDependency::new("serde-json", "1"));

        assert_eq!(render('D', &Arg::from(rt), &mut imports).as_deref(), Some("serde_json"));
        assert_eq!(render('D', &Arg::from("x"), &mut imports), None);
    }

    #[test]
    fn test_string_formatter_quotes() {
        let mut imports = ImportSet::new();
        assert_eq!(
            render('S', &Arg::from("say \"hi\""), &mut imports).as_deref(),
            Some(r#""say \"hi\"""#)
        );
        assert_eq!(
            render('S', &Arg::from(Symbol::new(RustType::string())), &mut imports),
            None
        );
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = FormatterRegistry::new();
        registry.register('X', format_literal).unwrap();
        let err = registry.register('X', format_literal).unwrap_err();
        assert!(matches!(*err, Error::DuplicateFormatter { tag: 'X' }));
    }

    #[test]
    fn test_rust_registry_tags() {
        let tags: String = FormatterRegistry::rust().tags().collect();
        assert_eq!(tags, "DLQST");
    }
}
