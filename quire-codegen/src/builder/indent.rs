//! Indentation configuration for generated code.

use serde::Deserialize;

/// Indentation style for generated code.
///
/// Deserializes from a width (`indent = 4`) or the keyword `"tab"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndentRepr")]
pub enum Indent {
    /// Spaces with the specified width (e.g., 2 or 4).
    Spaces(u8),
    /// Tab character.
    Tab,
}

impl Indent {
    /// 4-space indentation (rustfmt default).
    pub const RUST: Self = Self::Spaces(4);

    /// The text for one indent level.
    pub fn unit(&self) -> String {
        match self {
            Self::Spaces(width) => " ".repeat(usize::from(*width)),
            Self::Tab => "\t".to_string(),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::RUST
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndentRepr {
    Width(u8),
    Keyword(String),
}

impl TryFrom<IndentRepr> for Indent {
    type Error = String;

    fn try_from(repr: IndentRepr) -> Result<Self, Self::Error> {
        match repr {
            IndentRepr::Width(0) => Err("indent width must be at least 1".to_string()),
            IndentRepr::Width(width) => Ok(Self::Spaces(width)),
            IndentRepr::Keyword(k) if k.eq_ignore_ascii_case("tab") => Ok(Self::Tab),
            IndentRepr::Keyword(k) => Err(format!("unknown indent `{k}`, expected a width or \"tab\"")),
        }
    }
}
