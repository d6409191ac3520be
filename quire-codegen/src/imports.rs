//! Import and dependency collection.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{trace, warn};

use crate::error::{Error, Result};

/// A single `use module::name;` entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Import {
    pub module: String,
    pub name: String,
}

impl Import {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

/// Manifest section a dependency belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DependencyScope {
    #[default]
    Normal,
    Dev,
}

impl DependencyScope {
    fn section(&self) -> &'static str {
        match self {
            Self::Normal => "dependencies",
            Self::Dev => "dev-dependencies",
        }
    }
}

/// Specification for a crate dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CargoDependency {
    /// Crate name as it appears in the manifest
    pub name: String,
    /// Version requirement (e.g., "1.0", "^2.0")
    pub version: Option<String>,
    /// Local path for workspace crates
    pub path: Option<String>,
    /// Features to enable
    pub features: BTreeSet<String>,
    /// Whether this is an optional dependency
    pub optional: bool,
    pub scope: DependencyScope,
}

impl CargoDependency {
    /// Create a dependency on a published crate.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
            path: None,
            features: BTreeSet::new(),
            optional: false,
            scope: DependencyScope::Normal,
        }
    }

    /// Create a dependency on a local crate.
    pub fn local(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            path: Some(path.into()),
            features: BTreeSet::new(),
            optional: false,
            scope: DependencyScope::Normal,
        }
    }

    /// Add features to enable.
    pub fn with_features(mut self, features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.features.extend(features.into_iter().map(Into::into));
        self
    }

    /// Mark as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Move to `[dev-dependencies]`.
    pub fn dev(mut self) -> Self {
        self.scope = DependencyScope::Dev;
        self
    }

    /// Name used in `use` paths (`serde-json` -> `serde_json`).
    pub fn crate_name(&self) -> String {
        self.name.replace('-', "_")
    }

    fn to_toml(&self) -> toml::Value {
        if self.path.is_none() && self.features.is_empty() && !self.optional {
            if let Some(version) = &self.version {
                return toml::Value::String(version.clone());
            }
        }
        let mut table = toml::Table::new();
        if let Some(version) = &self.version {
            table.insert("version".into(), version.clone().into());
        }
        if let Some(path) = &self.path {
            table.insert("path".into(), path.clone().into());
        }
        if !self.features.is_empty() {
            let features: Vec<toml::Value> =
                self.features.iter().map(|f| f.clone().into()).collect();
            table.insert("features".into(), toml::Value::Array(features));
        }
        if self.optional {
            table.insert("optional".into(), true.into());
        }
        toml::Value::Table(table)
    }
}

/// Everything a unit of generated text needs in scope.
///
/// Entries are kept sorted, so the rendered output does not depend on the
/// order in which they were added.
///
/// # Example
///
/// ```
/// use quire_codegen::imports::ImportSet;
///
/// let mut imports = ImportSet::new();
/// imports.add_import("std::collections", "HashMap");
/// imports.add_import("std::collections", "HashSet");
/// imports.add_import("std::io", "Read");
/// imports.add_import("std::io", "Read");
///
/// assert_eq!(
///     imports.render(),
///     "use std::collections::{HashMap, HashSet};\nuse std::io::Read;"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    /// Entries referenced by this writer's own text
    local: BTreeSet<Import>,
    /// Entries copied from absorbed child writers
    inherited: BTreeSet<Import>,
    dependencies: BTreeMap<(DependencyScope, String), CargoDependency>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol import from a module.
    pub fn add_import(&mut self, module: impl Into<String>, name: impl Into<String>) {
        self.add(Import::new(module, name));
    }

    pub fn add(&mut self, import: Import) {
        if self.local.insert(import.clone()) {
            trace!(module = %import.module, name = %import.name, "import added");
        }
    }

    /// Add a crate dependency.
    ///
    /// Repeated crates merge their feature sets; the first version wins.
    pub fn add_dependency(&mut self, dependency: CargoDependency) {
        let key = (dependency.scope, dependency.name.clone());
        match self.dependencies.get_mut(&key) {
            Some(existing) => {
                if existing.version != dependency.version || existing.path != dependency.path {
                    warn!(
                        krate = %dependency.name,
                        kept = ?existing.version,
                        ignored = ?dependency.version,
                        "conflicting dependency requirements"
                    );
                }
                existing.features.extend(dependency.features);
                existing.optional &= dependency.optional;
            }
            None => {
                self.dependencies.insert(key, dependency);
            }
        }
    }

    /// Copy a child's entries into this set.
    ///
    /// The child's imports become inherited entries: visible to
    /// [`Self::contains`] but not rendered, since nested scopes declare their
    /// own `use` lines. Later changes to the child are not reflected here.
    pub fn absorb(&mut self, child: &ImportSet) {
        self.inherited.extend(child.local.iter().cloned());
        self.inherited.extend(child.inherited.iter().cloned());
        for dependency in child.dependencies.values() {
            self.add_dependency(dependency.clone());
        }
    }

    /// Move another set's entries into this one as local entries.
    pub fn merge(&mut self, other: ImportSet) {
        self.local.extend(other.local);
        self.inherited.extend(other.inherited);
        for dependency in other.dependencies.into_values() {
            self.add_dependency(dependency);
        }
    }

    /// Check whether `name` is already imported here from a module other than
    /// `module`, so a second `use` would be ambiguous.
    pub fn clashes(&self, module: &str, name: &str) -> bool {
        self.local.iter().any(|i| i.name == name && i.module != module)
    }

    /// Check whether the import is needed anywhere in this unit or below it.
    pub fn contains(&self, import: &Import) -> bool {
        self.local.contains(import) || self.inherited.contains(import)
    }

    /// Check if a specific symbol is imported from a module.
    pub fn has_symbol(&self, module: &str, name: &str) -> bool {
        self.contains(&Import::new(module, name))
    }

    /// Imports rendered by this unit.
    pub fn local(&self) -> impl Iterator<Item = &Import> {
        self.local.iter()
    }

    /// Every import this unit and its absorbed children need, sorted.
    pub fn all(&self) -> impl Iterator<Item = &Import> {
        self.local.union(&self.inherited)
    }

    /// Dependencies sorted by scope, then name.
    pub fn dependencies(&self) -> impl Iterator<Item = &CargoDependency> {
        self.dependencies.values()
    }

    /// Check whether a crate is required.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.keys().any(|(_, n)| n == name)
    }

    /// Check whether this unit renders no `use` lines.
    ///
    /// Inherited imports and dependencies are not considered.
    pub fn has_no_local_imports(&self) -> bool {
        self.local.is_empty()
    }

    /// Render local imports as `use` statements, one line per module.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        let mut entries = self.local.iter().peekable();
        while let Some(first) = entries.next() {
            let mut names = vec![first.name.as_str()];
            while let Some(next) = entries.next_if(|i| i.module == first.module) {
                names.push(next.name.as_str());
            }
            if names.len() == 1 {
                lines.push(format!("use {}::{};", first.module, names[0]));
            } else {
                lines.push(format!("use {}::{{{}}};", first.module, names.join(", ")));
            }
        }
        lines.join("\n")
    }

    /// Render dependencies as Cargo manifest sections.
    pub fn render_manifest(&self) -> Result<String> {
        let mut doc = toml::Table::new();
        for ((scope, name), dependency) in &self.dependencies {
            let section = doc
                .entry(scope.section())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            if let toml::Value::Table(section) = section {
                section.insert(name.clone(), dependency.to_toml());
            }
        }
        toml::to_string(&doc).map_err(|e| Box::new(Error::Manifest(e)))
    }
}
