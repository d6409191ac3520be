//! Text building primitives.
//!
//! - [`CodeBuffer`] - indentation-aware text buffer
//! - [`Indent`] - indentation configuration

mod buffer;
mod indent;

pub use buffer::CodeBuffer;
pub use indent::Indent;
