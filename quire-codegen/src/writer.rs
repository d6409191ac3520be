//! The stateful source writer.

use std::{
    ops::{Deref, DerefMut},
    sync::Arc,
};

use tracing::trace;

use crate::{
    builder::CodeBuffer,
    config::WriterConfig,
    context::ContextStack,
    error::{Error, Result},
    format::{Arg, FormatContext, FormatterRegistry},
    imports::{CargoDependency, ImportSet},
    naming::NameGenerator,
    template,
};

/// A stateful writer for one unit of generated Rust.
///
/// Text is written through block primitives, literal lines or templates.
/// Rendering a type through a template registers its import, so
/// [`Writer::render`] always emits exactly the imports the body refers to.
///
/// # Example
///
/// ```
/// use quire_codegen::{RustType, Symbol, Writer};
///
/// let shape = Symbol::new(RustType::named("crate::model", "Shape"));
///
/// let mut writer = Writer::new("src/ops.rs", "crate::ops");
/// writer
///     .template_block("pub fn area(shape: &#{shape}) -> f64", &[("shape", shape.into())], |w| {
///         w.line("shape.width * shape.height");
///         Ok(())
///     })
///     .unwrap();
///
/// assert_eq!(
///     writer.render().unwrap(),
///     "// Code generated by quire. DO NOT EDIT.\n\n\
///      use crate::model::Shape;\n\n\
///      pub fn area(shape: &Shape) -> f64 {\n    shape.width * shape.height\n}\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    path: String,
    namespace: String,
    config: WriterConfig,
    formatters: Arc<FormatterRegistry>,
    pub(crate) code: CodeBuffer,
    pub(crate) imports: ImportSet,
    names: NameGenerator,
    pub(crate) context: ContextStack,
}

impl Writer {
    /// Create a writer with the default configuration and Rust formatters.
    pub fn new(path: impl Into<String>, namespace: impl Into<String>) -> Self {
        let config = WriterConfig::default();
        Self::build(
            path.into(),
            namespace.into(),
            config,
            Arc::new(FormatterRegistry::rust()),
        )
    }

    /// Create a writer with explicit settings and formatters.
    pub fn with_config(
        path: impl Into<String>,
        namespace: impl Into<String>,
        config: WriterConfig,
        formatters: Arc<FormatterRegistry>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(path.into(), namespace.into(), config, formatters))
    }

    /// Create a writer for an inline fragment of `namespace`.
    pub fn fragment(namespace: impl Into<String>) -> Self {
        Self::build(
            String::new(),
            namespace.into(),
            WriterConfig::fragment(),
            Arc::new(FormatterRegistry::rust()),
        )
    }

    pub(crate) fn build(
        path: String,
        namespace: String,
        config: WriterConfig,
        formatters: Arc<FormatterRegistry>,
    ) -> Self {
        Self {
            code: CodeBuffer::new(config.indent),
            context: ContextStack::new(config.marker),
            imports: ImportSet::new(),
            names: NameGenerator::new(),
            path,
            namespace,
            config,
            formatters,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn formatters(&self) -> &Arc<FormatterRegistry> {
        &self.formatters
    }

    pub fn imports(&self) -> &ImportSet {
        &self.imports
    }

    /// Body text written so far, without banner or imports.
    pub fn body(&self) -> &str {
        self.code.as_str()
    }

    /// Require `module::name` in this unit's `use` block.
    pub fn add_import(&mut self, module: impl Into<String>, name: impl Into<String>) -> &mut Self {
        self.imports.add_import(module, name);
        self
    }

    pub fn add_dependency(&mut self, dependency: CargoDependency) -> &mut Self {
        self.imports.add_dependency(dependency);
        self
    }

    /// A local name that does not collide with other names from this writer.
    pub fn fresh_name(&mut self, prefix: &str) -> String {
        self.names.fresh(prefix)
    }

    // =========================================================================
    // Context frames
    // =========================================================================

    /// Push a context frame that is popped when the guard is dropped.
    pub fn push_state(&mut self) -> StateGuard<'_> {
        self.context.push();
        StateGuard { writer: self }
    }

    /// Run `f` inside a fresh context frame.
    pub fn with_state<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut guard = self.push_state();
        f(&mut guard)
    }

    /// Prefix written at the start of every new line in the current frame.
    pub fn set_newline_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.context.set_newline_prefix(prefix);
        self
    }

    /// Change the placeholder marker for the current frame.
    pub fn set_marker(&mut self, marker: char) -> Result<&mut Self> {
        if !template::is_valid_marker(marker) {
            return Err(Box::new(Error::InvalidMarker { marker }));
        }
        self.context.set_marker(marker);
        Ok(self)
    }

    /// Bind `name` in the current frame.
    pub fn bind(&mut self, name: impl Into<String>, arg: impl Into<Arg>) -> &mut Self {
        self.context.bind(name, arg.into());
        self
    }

    // =========================================================================
    // Literal text
    // =========================================================================

    /// Write a line of literal text.
    pub fn line(&mut self, text: &str) -> &mut Self {
        let prefix = self.context.newline_prefix().to_string();
        self.code.push_line(text, &prefix);
        self
    }

    /// Write literal text without terminating the line.
    pub fn raw(&mut self, text: &str) -> &mut Self {
        let prefix = self.context.newline_prefix().to_string();
        self.code.push_str(text, &prefix);
        self
    }

    /// Write an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.code.push_blank();
        self
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// Resolve a template without writing it.
    ///
    /// Imports registered by formatters are still recorded, but only when the
    /// whole template resolves.
    pub fn resolve(&mut self, template: &str, args: &[(&str, Arg)]) -> Result<String> {
        let mut guard = self.push_state();
        for (name, arg) in args {
            guard.context.bind(*name, arg.clone());
        }
        guard.resolve_in_frame(template)
    }

    fn resolve_in_frame(&mut self, template: &str) -> Result<String> {
        let indent = self.code.indent_str();
        let mut scratch = ImportSet::new();
        let mut cx = FormatContext {
            indent: &indent,
            namespace: &self.namespace,
            existing: &self.imports,
            imports: &mut scratch,
        };
        let text = template::resolve(template, &self.context, &self.formatters, &mut cx)?;
        self.imports.merge(scratch);
        Ok(text)
    }

    /// Resolve a template and write it as a line.
    pub fn template(&mut self, template: &str, args: &[(&str, Arg)]) -> Result<&mut Self> {
        let text = self.resolve(template, args)?;
        Ok(self.line(&text))
    }

    /// Resolve a template and write it without terminating the line.
    pub fn template_inline(&mut self, template: &str, args: &[(&str, Arg)]) -> Result<&mut Self> {
        let text = self.resolve(template, args)?;
        Ok(self.raw(&text))
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Write `header {` and indent.
    pub fn open_block(&mut self, header: &str) -> &mut Self {
        if header.is_empty() {
            self.open_with("{")
        } else {
            self.open_with(&format!("{header} {{"))
        }
    }

    /// Dedent and write `}` followed by `footer`.
    ///
    /// # Panics
    ///
    /// Panics when no block is open.
    pub fn close_block(&mut self, footer: &str) -> &mut Self {
        self.close_with(&format!("}}{footer}"))
    }

    fn open_with(&mut self, text: &str) -> &mut Self {
        self.code.end_line();
        self.line(text);
        self.code.push_indent();
        self
    }

    fn close_with(&mut self, text: &str) -> &mut Self {
        self.code.end_line();
        self.code.push_dedent();
        self.line(text)
    }

    /// Write `header { body }`.
    ///
    /// The block is closed even when `body` fails; the failure is returned
    /// afterwards.
    pub fn block(
        &mut self,
        header: &str,
        body: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<&mut Self> {
        self.open_block(header);
        let result = body(self);
        self.close_block("");
        result?;
        Ok(self)
    }

    /// Like [`Writer::block`] with a templated header.
    pub fn template_block(
        &mut self,
        header: &str,
        args: &[(&str, Arg)],
        body: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<&mut Self> {
        let header = self.resolve(header, args)?;
        self.block(&header, body)
    }

    /// Wrap `body` in `before` ... `after` only when `conditional` holds.
    ///
    /// ```
    /// use quire_codegen::Writer;
    ///
    /// let mut w = Writer::fragment("crate");
    /// for nullable in [true, false] {
    ///     w.conditional_block("Some(", "),", nullable, |w| {
    ///         w.line("value,");
    ///         Ok(())
    ///     })
    ///     .unwrap();
    /// }
    /// assert_eq!(w.body(), "Some(\n    value,\n),\nvalue,\n");
    /// ```
    pub fn conditional_block(
        &mut self,
        before: &str,
        after: &str,
        conditional: bool,
        body: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<&mut Self> {
        if !conditional {
            body(self)?;
            return Ok(self);
        }
        self.open_with(before);
        let result = body(self);
        self.close_with(after);
        result?;
        Ok(self)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Number of blocks currently open.
    pub fn open_blocks(&self) -> usize {
        self.code.current_indent()
    }

    pub(crate) fn check_balanced(&self) -> Result<()> {
        let open_blocks = self.code.current_indent();
        let open_frames = self.context.depth() - 1;
        if open_blocks == 0 && open_frames == 0 {
            return Ok(());
        }
        Err(Box::new(Error::Unbalanced {
            path: self.path.clone(),
            open_blocks,
            open_frames,
        }))
    }

    /// Render banner, imports and body.
    ///
    /// Fails rather than produce truncated output when a block or context
    /// frame is still open.
    pub fn render(&self) -> Result<String> {
        self.check_balanced()?;
        let mut out = String::new();
        let imports = self.imports.render();
        for header in [self.config.banner.as_str(), imports.as_str()] {
            if !header.is_empty() {
                out.push_str(header);
                out.push_str("\n\n");
            }
        }
        if self.code.is_empty() && out.ends_with("\n\n") {
            out.pop();
        }
        out.push_str(self.code.as_str());
        trace!(path = %self.path, bytes = out.len(), "rendered writer");
        Ok(out)
    }
}

/// A pushed context frame; popped on drop.
///
/// Dereferences to the [`Writer`], so it can be written through directly.
pub struct StateGuard<'a> {
    writer: &'a mut Writer,
}

impl Deref for StateGuard<'_> {
    type Target = Writer;

    fn deref(&self) -> &Writer {
        self.writer
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut Writer {
        self.writer
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.writer.context.pop();
    }
}
