//! Concrete syntax tree handed over by the editor
//!
//! The engine never owns a parser state: it reads an immutable, arena-indexed
//! tree through [`SyntaxNode`] handles. Every `children()` call yields an
//! independent iterator, so nested handling (chords, dotted pairs) cannot
//! disturb the caller's position.
//!
//! ## Modules
//!
//! - `kind`: Closed set of node kinds the grammar produces
//! - `tree`: Arena storage, node handles, builder and host interchange format

pub mod kind;
pub mod tree;

pub use kind::{NodeKind, Ornament};
pub use tree::{Children, NodeId, RawNode, SyntaxNode, SyntaxTree, TreeBuilder, TreeError};
