//! Layer 0: Source text
//!
//! Pure text positions with no musical knowledge. Everything the engine
//! reports back to the editor (measure spans, event spans, diagnostics) is
//! expressed as byte ranges into the document string.
//!
//! ## Modules
//!
//! - `cursor`: Byte ranges, selections and safe slicing

pub mod cursor;

// Re-exports for convenience
pub use cursor::{slice, Selection, TextRange};
