use std::ops::Range;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for writer operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for template errors.
///
/// Holds the template text so every resolution error can point at the
/// offending placeholder.
#[derive(Debug, Clone)]
pub(crate) struct TemplateSource {
    src: String,
}

impl TemplateSource {
    pub(crate) fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }

    fn named_source(&self) -> NamedSource<String> {
        NamedSource::new("template", self.src.clone())
    }

    pub(crate) fn stray_marker(&self, marker: char, span: Range<usize>) -> Box<Error> {
        Box::new(Error::StrayMarker {
            marker,
            src: self.named_source(),
            span: span.into(),
        })
    }

    pub(crate) fn malformed(&self, reason: impl Into<String>, span: Range<usize>) -> Box<Error> {
        Box::new(Error::MalformedPlaceholder {
            reason: reason.into(),
            src: self.named_source(),
            span: span.into(),
        })
    }

    pub(crate) fn unknown_binding(
        &self,
        name: &str,
        span: Range<usize>,
        available: &[String],
    ) -> Box<Error> {
        let available = if available.is_empty() {
            "none".to_string()
        } else {
            available.join(", ")
        };
        Box::new(Error::UnknownBinding {
            name: name.to_string(),
            available,
            src: self.named_source(),
            span: span.into(),
        })
    }

    pub(crate) fn unknown_formatter(&self, tag: char, name: &str, span: Range<usize>) -> Box<Error> {
        Box::new(Error::UnknownFormatter {
            tag,
            name: name.to_string(),
            src: self.named_source(),
            span: span.into(),
        })
    }

    pub(crate) fn unsupported_value(
        &self,
        name: &str,
        tag: char,
        kind: &'static str,
        span: Range<usize>,
    ) -> Box<Error> {
        Box::new(Error::UnsupportedValue {
            name: name.to_string(),
            tag,
            kind,
            src: self.named_source(),
            span: span.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("formatter `{tag}` is already registered")]
    #[diagnostic(
        code(quire::duplicate_formatter),
        help("each formatter tag can only be registered once per registry")
    )]
    DuplicateFormatter { tag: char },

    #[error("cannot open module `{module}` in fragment writer `{path}`")]
    #[diagnostic(
        code(quire::nested_scope_forbidden),
        help("fragments are spliced inline; open the module on a source writer instead")
    )]
    NestedScopeForbidden { module: String, path: String },

    #[error("`{marker}` cannot be used as the template marker")]
    #[diagnostic(
        code(quire::invalid_marker),
        help("pick a punctuation character other than `{{`, `}}` or `:`")
    )]
    InvalidMarker { marker: char },

    #[error("invalid writer configuration")]
    #[diagnostic(code(quire::config))]
    Config(#[source] toml::de::Error),

    #[error("failed to render dependency manifest")]
    #[diagnostic(code(quire::manifest))]
    Manifest(#[source] toml::ser::Error),

    #[error("unknown template binding `{name}`")]
    #[diagnostic(code(quire::unknown_binding), help("bound names: {available}"))]
    UnknownBinding {
        name: String,
        available: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not bound in any enclosing scope")]
        span: SourceSpan,
    },

    #[error("no formatter registered for tag `{tag}` (binding `{name}`)")]
    #[diagnostic(code(quire::unknown_formatter))]
    UnknownFormatter {
        tag: char,
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown formatter")]
        span: SourceSpan,
    },

    #[error("no formatter for type: `{tag}` cannot render {kind} binding `{name}`")]
    #[diagnostic(code(quire::unsupported_value))]
    UnsupportedValue {
        name: String,
        tag: char,
        kind: &'static str,
        #[source_code]
        src: NamedSource<String>,
        #[label("{kind} value")]
        span: SourceSpan,
    },

    #[error("malformed placeholder: {reason}")]
    #[diagnostic(code(quire::malformed_placeholder))]
    MalformedPlaceholder {
        reason: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("stray `{marker}` in template")]
    #[diagnostic(
        code(quire::stray_marker),
        help("write `{marker}{marker}` for a literal `{marker}`")
    )]
    StrayMarker {
        marker: char,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected `{{` or another `{marker}`")]
        span: SourceSpan,
    },

    #[error("writer `{path}` is unbalanced: {open_blocks} open block(s), {open_frames} open context frame(s)")]
    #[diagnostic(
        code(quire::unbalanced),
        help("every open_block needs a close_block before rendering")
    )]
    Unbalanced {
        path: String,
        open_blocks: usize,
        open_frames: usize,
    },
}
