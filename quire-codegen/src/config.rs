//! Writer configuration.

use serde::Deserialize;

use crate::{
    builder::Indent,
    error::{Error, Result},
    template::is_valid_marker,
};

/// Banner written at the top of every root writer.
pub const DEFAULT_BANNER: &str = "// Code generated by quire. DO NOT EDIT.";

/// What kind of output unit a writer produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A source file or module body; may contain nested modules.
    #[default]
    Source,
    /// A snippet spliced into other text; cannot contain modules.
    Fragment,
}

/// Settings shared by a writer and its sub-writers.
///
/// # Example
///
/// ```
/// use quire_codegen::{FileKind, Indent, WriterConfig};
///
/// let config = WriterConfig::from_toml_str(
///     r#"
///     indent = 2
///     banner = ""
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.indent, Indent::Spaces(2));
/// assert_eq!(config.marker, '#');
/// assert!(config.banner.is_empty());
/// assert_eq!(config.kind, FileKind::Source);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterConfig {
    pub indent: Indent,
    /// Character that starts a template placeholder.
    pub marker: char,
    /// First line of the rendered file; empty to omit.
    pub banner: String,
    pub kind: FileKind,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: Indent::RUST,
            marker: '#',
            banner: DEFAULT_BANNER.to_string(),
            kind: FileKind::Source,
        }
    }
}

impl WriterConfig {
    /// Configuration for inline fragments: no banner, no nested modules.
    pub fn fragment() -> Self {
        Self {
            banner: String::new(),
            kind: FileKind::Fragment,
            ..Self::default()
        }
    }

    /// Parse and validate a configuration from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Box::new(Error::Config(e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_marker(self.marker) {
            return Err(Box::new(Error::InvalidMarker {
                marker: self.marker,
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(WriterConfig::from_toml_str("").unwrap(), WriterConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = WriterConfig::from_toml_str(
            r#"
            indent = "tab"
            marker = "$"
            banner = "// generated"
            kind = "fragment"
            "#,
        )
        .unwrap();

        assert_eq!(config.indent, Indent::Tab);
        assert_eq!(config.marker, '$');
        assert_eq!(config.banner, "// generated");
        assert_eq!(config.kind, FileKind::Fragment);
    }

    #[test]
    fn test_invalid_marker_rejected() {
        let err = WriterConfig::from_toml_str(r#"marker = "{""#).unwrap_err();
        assert!(matches!(*err, Error::InvalidMarker { marker: '{' }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = WriterConfig::from_toml_str("colour = true").unwrap_err();
        assert!(matches!(*err, Error::Config(_)));
    }

    #[test]
    fn test_bad_indent_rejected() {
        let err = WriterConfig::from_toml_str("indent = 0").unwrap_err();
        assert!(matches!(*err, Error::Config(_)));
    }
}
