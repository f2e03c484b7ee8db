//! Score, sections and measures
//!
//! ```text
//! Score
//! └── Section            (metadata scope)
//!     ├── metadata       K:, L:, M:, Q:, ...
//!     └── Measure        (barline scope)
//!         ├── left/right barline
//!         └── Event      note, chord, rest, decoration, ...
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::barlines::Barline;
use super::elements::Event;
use super::metadata::Metadata;
use crate::text::cursor::TextRange;
use crate::theory::{to_f64, Fraction};

/// Fill state of a measure
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MeasureStatus {
    #[default]
    Valid,
    Overfilled,
    Underfilled,
    #[serde(rename = "No right barline")]
    NoRightBarline,
}

impl MeasureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasureStatus::Valid => "Valid",
            MeasureStatus::Overfilled => "Overfilled",
            MeasureStatus::Underfilled => "Underfilled",
            MeasureStatus::NoRightBarline => "No right barline",
        }
    }
}

impl fmt::Display for MeasureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Measure {
    /// Measure number; 0 is the pickup before the first barline
    pub index: usize,
    pub events: Vec<Event>,
    pub left_barline: Option<Barline>,
    pub right_barline: Option<Barline>,
    /// Left boundary (byte offset)
    pub start: Option<usize>,
    /// Right boundary: where the closing barline begins
    pub end: Option<usize>,
    /// Sum of the events' measure fractions
    pub duration: Fraction,
    pub status: MeasureStatus,
    /// Full (within tolerance) or a pickup
    pub is_complete: bool,
}

impl Measure {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            events: Vec::new(),
            left_barline: None,
            right_barline: None,
            start: None,
            end: None,
            duration: Fraction::from_integer(0),
            status: MeasureStatus::Valid,
            is_complete: false,
        }
    }

    /// Measure opened by a barline
    pub fn after_barline(index: usize, barline: Barline) -> Self {
        let mut measure = Measure::new(index);
        measure.start = Some(barline.range.to);
        measure.left_barline = Some(barline);
        measure
    }

    pub fn is_pickup(&self) -> bool {
        self.index == 0
    }

    /// Has a left boundary but was not closed yet
    pub fn is_open(&self) -> bool {
        self.start.is_some() && self.right_barline.is_none()
    }

    /// Closed by a barline
    pub fn is_terminated(&self) -> bool {
        self.right_barline.is_some()
    }

    pub fn duration_f64(&self) -> f64 {
        to_f64(self.duration)
    }

    /// Span from the left boundary to the right boundary, falling back to
    /// the events for whichever side is missing
    pub fn span(&self) -> TextRange {
        let first = self.events.first().map(|e| e.range().from);
        let last = self.events.last().map(|e| e.range().to);
        let from = self.start.or(first).unwrap_or(0);
        let to = self.end.or(last).unwrap_or(from).max(from);
        TextRange::new(from, to)
    }

    /// Notes, chords and rests
    pub fn timed_events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_timed())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Section {
    pub metadata: Metadata,
    /// Empty for metadata-only sections
    pub measures: Vec<Measure>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_measures(&self) -> bool {
        !self.measures.is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Score {
    pub sections: Vec<Section>,
}

impl Score {
    /// All measures in document order
    pub fn measures(&self) -> impl Iterator<Item = &Measure> {
        self.sections.iter().flat_map(|s| s.measures.iter())
    }

    /// All events in document order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.measures().flat_map(|m| m.events.iter())
    }

    /// Whether the user has written any note, chord or rest
    pub fn has_notes(&self) -> bool {
        self.events().any(|e| e.is_timed())
    }

    /// Running metadata in effect for each section, starting from `defaults`
    pub fn effective_metadata(&self, defaults: &Metadata) -> Vec<Metadata> {
        let mut running = defaults.clone();
        self.sections
            .iter()
            .map(|section| {
                running.merge_from(&section.metadata);
                running.clone()
            })
            .collect()
    }

    /// Last value written for a header key anywhere in the score
    pub fn property(&self, key: char) -> Option<&str> {
        self.sections
            .iter()
            .rev()
            .find_map(|section| section.metadata.get(key))
    }

    pub fn title(&self) -> Option<&str> {
        self.property('T')
    }
}
