//! Cursor lookups: which measure and event a selection falls in

use serde::{Deserialize, Serialize};

use crate::models::elements::Event;
use crate::models::score::{Measure, Score};
use crate::text::cursor::{Selection, TextRange};

/// Address of a measure inside a score
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureRef {
    pub section: usize,
    /// Position within the section
    pub position: usize,
    /// Measure number
    pub index: usize,
}

/// Address of an event inside a score
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventRef {
    pub section: usize,
    pub measure: usize,
    pub event: usize,
}

/// Result of a position lookup; each list holds at most one entry
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CursorLocation {
    pub measures: Vec<MeasureRef>,
    pub events: Vec<EventRef>,
}

impl CursorLocation {
    pub fn is_empty(&self) -> bool {
        self.measures.is_empty() && self.events.is_empty()
    }

    pub fn measure<'s>(&self, score: &'s Score) -> Option<&'s Measure> {
        let r = self.measures.first()?;
        score.sections.get(r.section)?.measures.get(r.position)
    }

    pub fn event<'s>(&self, score: &'s Score) -> Option<&'s Event> {
        let r = self.events.first()?;
        score
            .sections
            .get(r.section)?
            .measures
            .get(r.measure)?
            .events
            .get(r.event)
    }
}

/// Find the measure and event under the main selection range
///
/// A measure matches when the selection lies within its span; the last
/// measure is open-ended to the right. An event matches when the selection
/// starts after the event's first character and ends within it.
pub fn locate(score: &Score, selection: &Selection) -> CursorLocation {
    let mut location = CursorLocation::default();
    let Some(TextRange { from, to }) = selection.main() else {
        return location;
    };
    if !score.has_notes() {
        return location;
    }

    let total = score.measures().count();
    let addressed = score.sections.iter().enumerate().flat_map(|(s, section)| {
        section
            .measures
            .iter()
            .enumerate()
            .map(move |(p, measure)| (s, p, measure))
    });

    for (n, (section, position, measure)) in addressed.enumerate() {
        let span = measure.span();
        let is_last = n + 1 == total;
        if location.measures.is_empty() && from >= span.from && (is_last || to <= span.to) {
            location.measures.push(MeasureRef {
                section,
                position,
                index: measure.index,
            });
        }

        if location.events.is_empty() {
            let hit = measure.events.iter().position(|event| {
                let range = event.range();
                from > range.from && to <= range.to
            });
            if let Some(event) = hit {
                location.events.push(EventRef {
                    section,
                    measure: position,
                    event,
                });
            }
        }

        if !location.measures.is_empty() && !location.events.is_empty() {
            break;
        }
    }
    location
}
