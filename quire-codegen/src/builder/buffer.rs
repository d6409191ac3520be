//! Indentation-aware text buffer.

use super::Indent;

/// Text buffer that indents every line it starts.
///
/// Text may contain newlines; the indentation and the active newline prefix
/// are written before the first character of each non-empty line.
///
/// # Example
///
/// ```
/// use quire_codegen::builder::CodeBuffer;
///
/// let mut code = CodeBuffer::rust();
/// code.push_line("fn main() {", "")
///     .push_indent()
///     .push_line("println!(\"Hello\");", "")
///     .push_dedent()
///     .push_line("}", "");
///
/// assert_eq!(code.as_str(), "fn main() {\n    println!(\"Hello\");\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuffer {
    indent_level: usize,
    unit: String,
    buffer: String,
    at_line_start: bool,
}

impl CodeBuffer {
    /// Create an empty buffer with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            unit: indent.unit(),
            buffer: String::new(),
            at_line_start: true,
        }
    }

    /// Create an empty buffer with 4-space indentation.
    pub fn rust() -> Self {
        Self::new(Indent::RUST)
    }

    /// Append text, starting each non-empty line with indentation and `prefix`.
    pub fn push_str(&mut self, text: &str, prefix: &str) -> &mut Self {
        for piece in text.split_inclusive('\n') {
            if self.at_line_start && piece != "\n" {
                self.write_indent();
                self.buffer.push_str(prefix);
            }
            self.buffer.push_str(piece);
            self.at_line_start = piece.ends_with('\n');
        }
        self
    }

    /// Append text and terminate the line.
    pub fn push_line(&mut self, text: &str, prefix: &str) -> &mut Self {
        self.push_str(text, prefix);
        self.buffer.push('\n');
        self.at_line_start = true;
        self
    }

    /// Append an empty line.
    pub fn push_blank(&mut self) -> &mut Self {
        self.end_line();
        self.buffer.push('\n');
        self
    }

    /// Terminate the current line if something was written on it.
    pub fn end_line(&mut self) -> &mut Self {
        if !self.at_line_start {
            self.buffer.push('\n');
            self.at_line_start = true;
        }
        self
    }

    /// Increase indentation level.
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level.
    ///
    /// # Panics
    ///
    /// Panics when the level is already zero: more blocks were closed than
    /// opened.
    pub fn push_dedent(&mut self) -> &mut Self {
        assert!(
            self.indent_level > 0,
            "dedent below zero: closed a block that was never opened"
        );
        self.indent_level -= 1;
        self
    }

    /// Get the current indentation level.
    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    /// The whitespace written at the start of a line at the current level.
    pub fn indent_str(&self) -> String {
        self.unit.repeat(self.indent_level)
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get a reference to the current buffer content.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(&self.unit);
        }
    }
}

impl Default for CodeBuffer {
    fn default() -> Self {
        Self::rust()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_line() {
        let mut code = CodeBuffer::rust();
        code.push_line("let x = 1;", "");
        assert_eq!(code.as_str(), "let x = 1;\n");
    }

    #[test]
    fn test_multiline_text_is_indented_per_line() {
        let mut code = CodeBuffer::new(Indent::Spaces(2));
        code.push_indent().push_line("a\nb\n\nc", "");
        assert_eq!(code.as_str(), "  a\n  b\n\n  c\n");
    }

    #[test]
    fn test_prefix_applies_to_each_line() {
        let mut code = CodeBuffer::rust();
        code.push_indent().push_line("first\nsecond", "/// ");
        assert_eq!(code.as_str(), "    /// first\n    /// second\n");
    }

    #[test]
    fn test_inline_text_continues_line() {
        let mut code = CodeBuffer::rust();
        code.push_str("let x = ", "").push_str("1;", "").end_line();
        assert_eq!(code.as_str(), "let x = 1;\n");
    }

    #[test]
    fn test_blank_terminates_open_line() {
        let mut code = CodeBuffer::rust();
        code.push_str("use std::io;", "").push_blank().push_line("fn main() {}", "");
        assert_eq!(code.as_str(), "use std::io;\n\nfn main() {}\n");
    }

    #[test]
    fn test_tab_indent() {
        let mut code = CodeBuffer::new(Indent::Tab);
        code.push_indent().push_indent().push_line("x", "");
        assert_eq!(code.as_str(), "\t\tx\n");
        assert_eq!(code.indent_str(), "\t\t");
    }

    #[test]
    #[should_panic(expected = "dedent below zero")]
    fn test_dedent_below_zero_panics() {
        CodeBuffer::rust().push_dedent();
    }
}
