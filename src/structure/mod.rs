//! Musical structure
//!
//! Derives the score from a syntax tree. Everything here is a pure pass over
//! its input; no state survives between calls.
//!
//! ## Modules
//!
//! - `classify`: top-level syntax node → score elements
//! - `builder`: element stream → sections and measures
//! - `timing`: ticks, measure fractions, seconds and pitch names
//! - `position`: selection → measure and event under the cursor

pub mod builder;
pub mod classify;
pub mod position;
pub mod timing;

pub use builder::{build_score, StructureBuilder};
pub use classify::classify;
pub use position::{locate, CursorLocation, EventRef, MeasureRef};
pub use timing::{annotate, TimingContext};
