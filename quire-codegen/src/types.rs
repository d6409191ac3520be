//! Type and symbol descriptors supplied by the model layer.
//!
//! A [`RustType`] describes the shape of a type; a [`Symbol`] pairs it with
//! the crates it needs; a [`RuntimeType`] names an item exported by a support
//! crate. Formatters turn these into text and register imports as they go.

use std::fmt;

use crate::imports::CargoDependency;

const COLLECTIONS: &str = "std::collections";

/// The shape of a Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RustType {
    /// A built-in type that never needs an import (`i64`, `bool`, `String`).
    Builtin(String),
    /// A named type defined in `namespace` (e.g. `crate::model`).
    Named { namespace: String, name: String },
    /// `Option<T>`.
    Option(Box<RustType>),
    /// `Vec<T>`.
    Vec(Box<RustType>),
    /// `&[T]`.
    Slice(Box<RustType>),
    /// `HashSet<T>`.
    HashSet(Box<RustType>),
    /// `HashMap<K, V>`.
    HashMap(Box<RustType>, Box<RustType>),
    /// `Box<T>`.
    Box(Box<RustType>),
    /// `(A, B, ...)`.
    Tuple(Vec<RustType>),
}

impl RustType {
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::Builtin(name.into())
    }

    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn option(inner: RustType) -> Self {
        Self::Option(Box::new(inner))
    }

    pub fn vec(inner: RustType) -> Self {
        Self::Vec(Box::new(inner))
    }

    pub fn slice(inner: RustType) -> Self {
        Self::Slice(Box::new(inner))
    }

    pub fn hash_set(inner: RustType) -> Self {
        Self::HashSet(Box::new(inner))
    }

    pub fn hash_map(key: RustType, value: RustType) -> Self {
        Self::HashMap(Box::new(key), Box::new(value))
    }

    pub fn boxed(inner: RustType) -> Self {
        Self::Box(Box::new(inner))
    }

    /// Convenience: `String`.
    pub fn string() -> Self {
        Self::builtin("String")
    }

    /// Check if this type may be absent.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Option(_))
    }

    /// Check if this type can be iterated.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Self::Vec(_) | Self::Slice(_) | Self::HashSet(_) | Self::HashMap(..)
        )
    }

    /// Type as written after its imports are in scope (`Option<Vec<Shape>>`).
    pub fn name(&self) -> String {
        self.render(&|_, _| false)
    }

    /// Fully qualified type. Prelude wrappers (`Option`, `Vec`, `Box`) stay short.
    pub fn qualified_name(&self) -> String {
        self.render(&|_, _| true)
    }

    /// Type name with the paths for which `qualify(module, name)` holds written
    /// in full, and every other path short.
    pub fn name_qualifying(&self, qualify: impl Fn(&str, &str) -> bool) -> String {
        self.render(&qualify)
    }

    /// Every `(module, name)` pair that must be imported to use [`Self::name`].
    pub fn imports(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.collect_imports(&mut out);
        out
    }

    fn collect_imports(&self, out: &mut Vec<(String, String)>) {
        match self {
            Self::Builtin(_) => {}
            Self::Named { namespace, name } => {
                if !namespace.is_empty() {
                    out.push((namespace.clone(), name.clone()));
                }
            }
            Self::Option(inner) | Self::Vec(inner) | Self::Slice(inner) | Self::Box(inner) => {
                inner.collect_imports(out)
            }
            Self::HashSet(inner) => {
                out.push((COLLECTIONS.to_string(), "HashSet".to_string()));
                inner.collect_imports(out);
            }
            Self::HashMap(key, value) => {
                out.push((COLLECTIONS.to_string(), "HashMap".to_string()));
                key.collect_imports(out);
                value.collect_imports(out);
            }
            Self::Tuple(members) => members.iter().for_each(|m| m.collect_imports(out)),
        }
    }

    fn render(&self, qualify: &dyn Fn(&str, &str) -> bool) -> String {
        let path = |namespace: &str, name: &str| {
            if !namespace.is_empty() && qualify(namespace, name) {
                format!("{namespace}::{name}")
            } else {
                name.to_string()
            }
        };
        match self {
            Self::Builtin(name) => name.clone(),
            Self::Named { namespace, name } => path(namespace, name),
            Self::Option(inner) => format!("Option<{}>", inner.render(qualify)),
            Self::Vec(inner) => format!("Vec<{}>", inner.render(qualify)),
            Self::Slice(inner) => format!("&[{}]", inner.render(qualify)),
            Self::Box(inner) => format!("Box<{}>", inner.render(qualify)),
            Self::HashSet(inner) => {
                format!("{}<{}>", path(COLLECTIONS, "HashSet"), inner.render(qualify))
            }
            Self::HashMap(key, value) => format!(
                "{}<{}, {}>",
                path(COLLECTIONS, "HashMap"),
                key.render(qualify),
                value.render(qualify)
            ),
            Self::Tuple(members) => {
                let members: Vec<_> = members.iter().map(|m| m.render(qualify)).collect();
                format!("({})", members.join(", "))
            }
        }
    }
}

impl fmt::Display for RustType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A model type resolved to Rust, with the crates it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    rust_type: RustType,
    dependencies: Vec<CargoDependency>,
}

impl Symbol {
    pub fn new(rust_type: RustType) -> Self {
        Self {
            rust_type,
            dependencies: Vec::new(),
        }
    }

    /// Add a crate this symbol needs in the build manifest.
    pub fn with_dependency(mut self, dependency: CargoDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn rust_type(&self) -> &RustType {
        &self.rust_type
    }

    pub fn dependencies(&self) -> &[CargoDependency] {
        &self.dependencies
    }

    pub fn name(&self) -> String {
        self.rust_type.name()
    }

    pub fn full_name(&self) -> String {
        self.rust_type.qualified_name()
    }

    /// Whether the value can be used directly, without unwrapping.
    pub fn is_direct(&self) -> bool {
        !self.rust_type.is_optional()
    }

    /// Wrap this symbol's type in `Option`.
    pub fn make_optional(self) -> Self {
        if self.rust_type.is_optional() {
            return self;
        }
        Self {
            rust_type: RustType::option(self.rust_type),
            dependencies: self.dependencies,
        }
    }
}

impl From<RustType> for Symbol {
    fn from(rust_type: RustType) -> Self {
        Self::new(rust_type)
    }
}

/// An item exported by a support crate, e.g. `bytes::Bytes`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeType {
    namespace: String,
    name: String,
    dependency: Option<CargoDependency>,
}

impl RuntimeType {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            dependency: None,
        }
    }

    /// Split a full path such as `bytes::Bytes` into namespace and name.
    pub fn from_path(path: &str) -> Self {
        match path.rsplit_once("::") {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::new("", path),
        }
    }

    pub fn with_dependency(mut self, dependency: CargoDependency) -> Self {
        self.dependency = Some(dependency);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependency(&self) -> Option<&CargoDependency> {
        self.dependency.as_ref()
    }

    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }

    /// View this runtime type as a symbol so it can flow through the model.
    pub fn to_symbol(&self) -> Symbol {
        let symbol = Symbol::new(RustType::named(&self.namespace, &self.name));
        match &self.dependency {
            Some(dep) => symbol.with_dependency(dep.clone()),
            None => symbol,
        }
    }
}

/// Visibility of an emitted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    /// `pub(crate)`.
    Crate,
    /// `pub(super)`.
    Super,
}

impl Visibility {
    /// Keyword prefix including the trailing space, empty for private items.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Public => "pub ",
            Self::Private => "",
            Self::Crate => "pub(crate) ",
            Self::Super => "pub(super) ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> RustType {
        RustType::named("crate::model", "Shape")
    }

    #[test]
    fn test_names() {
        let ty = RustType::option(RustType::vec(shape()));
        assert_eq!(ty.name(), "Option<Vec<Shape>>");
        assert_eq!(ty.qualified_name(), "Option<Vec<crate::model::Shape>>");
        assert_eq!(ty.to_string(), "Option<Vec<Shape>>");
    }

    #[test]
    fn test_map_names_and_imports() {
        let ty = RustType::hash_map(RustType::string(), shape());
        assert_eq!(ty.name(), "HashMap<String, Shape>");
        assert_eq!(
            ty.qualified_name(),
            "std::collections::HashMap<String, crate::model::Shape>"
        );
        assert_eq!(
            ty.imports(),
            vec![
                ("std::collections".to_string(), "HashMap".to_string()),
                ("crate::model".to_string(), "Shape".to_string()),
            ]
        );
    }

    #[test]
    fn test_selective_qualification() {
        let ty = RustType::hash_map(
            RustType::named("crate::a", "Error"),
            RustType::vec(RustType::named("crate::b", "Error")),
        );
        assert_eq!(
            ty.name_qualifying(|module, _| module == "crate::b"),
            "HashMap<Error, Vec<crate::b::Error>>"
        );
    }

    #[test]
    fn test_builtins_need_no_imports() {
        let ty = RustType::Tuple(vec![RustType::builtin("i32"), RustType::slice(RustType::builtin("u8"))]);
        assert_eq!(ty.name(), "(i32, &[u8])");
        assert!(ty.imports().is_empty());
    }

    #[test]
    fn test_symbol_optionality() {
        let symbol = Symbol::new(shape());
        assert!(symbol.is_direct());
        let optional = symbol.make_optional();
        assert!(!optional.is_direct());
        assert_eq!(optional.clone().make_optional(), optional);
    }

    #[test]
    fn test_runtime_type_from_path() {
        let rt = RuntimeType::from_path("bytes::buf::Bytes");
        assert_eq!(rt.namespace(), "bytes::buf");
        assert_eq!(rt.name(), "Bytes");
        assert_eq!(rt.full_name(), "bytes::buf::Bytes");
        assert_eq!(RuntimeType::from_path("u8").full_name(), "u8");
    }

    #[test]
    fn test_runtime_type_as_symbol() {
        let rt = RuntimeType::from_path("bytes::Bytes")
            .with_dependency(CargoDependency::new("bytes", "1"));
        let symbol = rt.to_symbol();
        assert_eq!(symbol.full_name(), "bytes::Bytes");
        assert_eq!(symbol.dependencies(), &[CargoDependency::new("bytes", "1")]);
    }

    #[test]
    fn test_visibility_prefix() {
        assert_eq!(Visibility::Public.prefix(), "pub ");
        assert_eq!(Visibility::Private.prefix(), "");
        assert_eq!(Visibility::Crate.prefix(), "pub(crate) ");
    }
}
