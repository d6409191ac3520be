//! Formatting state frames.

use indexmap::IndexMap;

use crate::format::Arg;

/// One snapshot of formatting state.
#[derive(Debug, Clone)]
pub struct Frame {
    newline_prefix: String,
    marker: char,
    bindings: IndexMap<String, Arg>,
}

impl Frame {
    pub fn newline_prefix(&self) -> &str {
        &self.newline_prefix
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    /// Names bound by this frame, in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

/// A stack of [`Frame`]s with a permanent base frame.
///
/// New frames inherit the newline prefix and marker of the frame below and
/// start without bindings of their own. Lookups walk from the innermost frame
/// outward, so inner bindings shadow outer ones.
#[derive(Debug, Clone)]
pub struct ContextStack {
    top: Frame,
    /// Frames under `top`; the base frame first.
    below: Vec<Frame>,
}

impl ContextStack {
    pub fn new(marker: char) -> Self {
        Self {
            top: Frame {
                newline_prefix: String::new(),
                marker,
                bindings: IndexMap::new(),
            },
            below: Vec::new(),
        }
    }

    pub fn push(&mut self) {
        let frame = Frame {
            newline_prefix: self.top.newline_prefix.clone(),
            marker: self.top.marker,
            bindings: IndexMap::new(),
        };
        let previous = std::mem::replace(&mut self.top, frame);
        self.below.push(previous);
    }

    /// Discard the top frame.
    ///
    /// # Panics
    ///
    /// Panics when only the base frame is left.
    pub fn pop(&mut self) {
        match self.below.pop() {
            Some(frame) => self.top = frame,
            None => panic!("popped the base context frame"),
        }
    }

    /// Number of frames, including the base frame.
    pub fn depth(&self) -> usize {
        self.below.len() + 1
    }

    pub fn top(&self) -> &Frame {
        &self.top
    }

    fn frames(&self) -> impl Iterator<Item = &Frame> {
        std::iter::once(&self.top).chain(self.below.iter().rev())
    }

    pub fn newline_prefix(&self) -> &str {
        &self.top.newline_prefix
    }

    pub fn marker(&self) -> char {
        self.top.marker
    }

    pub fn set_newline_prefix(&mut self, prefix: impl Into<String>) {
        self.top.newline_prefix = prefix.into();
    }

    pub fn set_marker(&mut self, marker: char) {
        self.top.marker = marker;
    }

    /// Bind `name` in the top frame, replacing an earlier binding there.
    pub fn bind(&mut self, name: impl Into<String>, arg: Arg) {
        self.top.bindings.insert(name.into(), arg);
    }

    /// Look up `name` from the innermost frame outward.
    pub fn resolve(&self, name: &str) -> Option<&Arg> {
        self.frames().find_map(|f| f.bindings.get(name))
    }

    /// Every visible name, innermost frame first, without duplicates.
    pub fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for frame in self.frames() {
            for name in frame.names() {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_inherits_prefix_and_marker() {
        let mut stack = ContextStack::new('#');
        stack.set_newline_prefix("/// ");
        stack.push();
        assert_eq!(stack.newline_prefix(), "/// ");
        assert_eq!(stack.marker(), '#');

        stack.set_newline_prefix("// ");
        stack.set_marker('$');
        stack.pop();
        assert_eq!(stack.newline_prefix(), "/// ");
        assert_eq!(stack.marker(), '#');
    }

    #[test]
    fn test_inner_binding_shadows_outer() {
        let mut stack = ContextStack::new('#');
        stack.bind("name", Arg::from("outer"));
        stack.push();
        stack.bind("name", Arg::from("inner"));
        assert_eq!(stack.resolve("name"), Some(&Arg::from("inner")));

        stack.pop();
        assert_eq!(stack.resolve("name"), Some(&Arg::from("outer")));
    }

    #[test]
    fn test_bindings_disappear_with_their_frame() {
        let mut stack = ContextStack::new('#');
        stack.push();
        stack.bind("local", Arg::from("x"));
        stack.pop();
        assert_eq!(stack.resolve("local"), None);
    }

    #[test]
    fn test_visible_names_innermost_first() {
        let mut stack = ContextStack::new('#');
        stack.bind("a", Arg::from("1"));
        stack.bind("b", Arg::from("2"));
        stack.push();
        stack.bind("c", Arg::from("3"));
        stack.bind("a", Arg::from("4"));
        assert_eq!(stack.visible_names(), vec!["c", "a", "b"]);
    }

    #[test]
    #[should_panic(expected = "popped the base context frame")]
    fn test_popping_base_frame_panics() {
        ContextStack::new('#').pop();
    }
}
