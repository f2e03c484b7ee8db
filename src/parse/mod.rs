//! Reference parser for the sketch notation
//!
//! Editors normally hand over their own syntax tree. This parser produces the
//! same tree shape from plain text so the engine can run without one.
//!
//! ## Modules
//!
//! - `tokens`: Character classes and barline recognition
//! - `grammar`: Error-tolerant recursive descent into a `SyntaxTree`

pub mod grammar;
pub mod tokens;

pub use grammar::parse_abc;
