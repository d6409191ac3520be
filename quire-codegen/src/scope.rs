//! Inline modules written by independent sub-writers.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::{
    config::{FileKind, WriterConfig},
    error::{Error, Result},
    naming::module_name,
    types::Visibility,
    writer::Writer,
};

/// A writer for the body of an inline module.
///
/// It starts with an empty body, no imports and its own name counter, and
/// shares its parent's formatters. It is consumed by [`Writer::absorb`], so it
/// cannot be absorbed twice or written to afterwards.
#[must_use = "a module writer does nothing until it is absorbed into its parent"]
#[derive(Debug)]
pub struct ModuleWriter {
    name: String,
    visibility: Visibility,
    writer: Writer,
}

impl ModuleWriter {
    /// Module identifier as it will be written.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.visibility = visibility;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

impl Deref for ModuleWriter {
    type Target = Writer;

    fn deref(&self) -> &Writer {
        &self.writer
    }
}

impl DerefMut for ModuleWriter {
    fn deref_mut(&mut self) -> &mut Writer {
        &mut self.writer
    }
}

impl Writer {
    /// Create a sub-writer for `mod name { ... }`.
    ///
    /// Fails for fragment writers, which are spliced inline and cannot hold
    /// modules.
    pub fn module(&self, name: &str) -> Result<ModuleWriter> {
        if self.config().kind == FileKind::Fragment {
            return Err(Box::new(Error::NestedScopeForbidden {
                module: name.to_string(),
                path: self.path().to_string(),
            }));
        }
        let name = module_name(name);
        let namespace = format!("{}::{}", self.namespace(), name.trim_start_matches("r#"));
        let config = WriterConfig {
            banner: String::new(),
            ..self.config().clone()
        };
        let writer = Writer::build(
            self.path().to_string(),
            namespace,
            config,
            self.formatters().clone(),
        );
        Ok(ModuleWriter {
            name,
            visibility: Visibility::default(),
            writer,
        })
    }

    /// Write a finished module into this writer.
    ///
    /// Emits the module header, splices the module's rendered text (its own
    /// `use` lines and body) at the current indentation, and copies the
    /// module's imports and dependencies into this writer's set.
    ///
    /// The spliced lines carry no newline prefix from the current frame.
    pub fn absorb(&mut self, module: ModuleWriter) -> Result<&mut Self> {
        let ModuleWriter {
            name,
            visibility,
            writer,
        } = module;
        let text = writer.render()?;
        self.open_block(&format!("{}mod {}", visibility.prefix(), name));
        self.code.push_str(&text, "");
        self.close_block("");
        self.imports.absorb(writer.imports());
        debug!(
            module = %name,
            parent = %self.namespace(),
            imports = writer.imports().all().count(),
            "absorbed module"
        );
        Ok(self)
    }

    /// Create, populate and absorb a module in one call.
    pub fn with_module(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut ModuleWriter) -> Result<()>,
    ) -> Result<&mut Self> {
        let mut module = self.module(name)?;
        f(&mut module)?;
        self.absorb(module)
    }
}
