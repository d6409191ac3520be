//! Documentation and comment rendering.

use crate::writer::Writer;

/// Spaces written in place of each tab.
const TAB_WIDTH: usize = 2;

/// Clean documentation text for line-prefixed rendering.
///
/// Blank lines are dropped (a lone `///` line followed by indented text would
/// turn that text into a code block), leading whitespace is stripped and tabs
/// become spaces.
///
/// ```
/// use quire_codegen::docs::normalize_docs;
///
/// assert_eq!(normalize_docs("Line1\n\nLine2\t\tend"), vec!["Line1", "Line2    end"]);
/// ```
pub fn normalize_docs(text: &str) -> Vec<String> {
    let tab = " ".repeat(TAB_WIDTH);
    text.lines()
        .map(str::trim_start)
        .filter(|line| !line.trim_end().is_empty())
        .map(|line| line.replace('\t', &tab))
        .collect()
}

impl Writer {
    /// Write item documentation as `///` lines.
    pub fn docs(&mut self, text: &str) -> &mut Self {
        self.prefixed_lines("/// ", text)
    }

    /// Write module documentation as `//!` lines.
    pub fn module_docs(&mut self, text: &str) -> &mut Self {
        self.prefixed_lines("//! ", text)
    }

    /// Write a `//` comment.
    pub fn comment(&mut self, text: &str) -> &mut Self {
        self.prefixed_lines("// ", text)
    }

    fn prefixed_lines(&mut self, prefix: &str, text: &str) -> &mut Self {
        let lines = normalize_docs(text);
        {
            let mut state = self.push_state();
            state.set_newline_prefix(prefix);
            for line in &lines {
                state.line(line);
            }
        }
        self
    }
}
