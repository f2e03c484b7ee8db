//! Models module for the ABC sketch engine
//!
//! This module contains the score model the structure builder produces:
//! elements coming out of the classifier, header metadata, barlines and the
//! section/measure hierarchy.

pub mod barlines;
pub mod elements;
pub mod metadata;
pub mod score;

// Re-export commonly used types
pub use barlines::{Barline, BarlineType};
pub use elements::*;
pub use metadata::{Metadata, MetadataEntry};
pub use score::{Measure, MeasureStatus, Score, Section};
