//! Structure builder: flat element stream → sections and measures
//!
//! A small state machine. Metadata opens a new section once the current one
//! has music; barlines close the current measure and open the next one; all
//! other events are appended to the current measure, creating it on demand.

use crate::diagnostics::{report_invalid_metadata, Diagnostic};
use crate::models::barlines::Barline;
use crate::models::elements::{Element, Event, GenericElement};
use crate::models::metadata::{normalize_value, split_metadata, Metadata};
use crate::models::score::{Measure, Score, Section};

pub struct StructureBuilder {
    /// Replacement values for invalid header fields
    defaults: Metadata,
    warn_invalid_metadata: bool,
    sections: Vec<Section>,
    /// Measure interrupted by metadata, continued in the next section
    unfinished: Option<Measure>,
    /// Index of the most recently opened measure
    counter: usize,
    /// Whether any measure has been opened yet
    started: bool,
    warnings: Vec<Diagnostic>,
}

impl StructureBuilder {
    pub fn new(defaults: Metadata, warn_invalid_metadata: bool) -> Self {
        Self {
            defaults,
            warn_invalid_metadata,
            sections: vec![Section::new()],
            unfinished: None,
            counter: 0,
            started: false,
            warnings: Vec::new(),
        }
    }

    /// Feed the next element; error markers are ignored
    pub fn push(&mut self, element: Element) {
        match element {
            Element::Metadata(metadata) => self.push_metadata(metadata),
            Element::Barline(barline) => self.push_barline(barline),
            Element::Event(event) => self.push_event(event),
            Element::Error(_) => {}
        }
    }

    fn current_section(&mut self) -> &mut Section {
        if self.sections.is_empty() {
            self.sections.push(Section::new());
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    fn push_metadata(&mut self, element: GenericElement) {
        let Some((key, written)) = split_metadata(&element.raw_text) else {
            log::warn!("ignoring malformed header line '{}'", element.raw_text);
            return;
        };

        let section = self.current_section();
        if section.has_measures() {
            // A measure that was opened but not closed moves on with the music
            let carried = if section.measures.last().is_some_and(Measure::is_open) {
                section.measures.pop()
            } else {
                None
            };
            if carried.is_some() {
                self.unfinished = carried;
            }
            self.sections.push(Section::new());
        }

        let (value, replaced) = normalize_value(key, &written, &self.defaults);
        if replaced {
            log::debug!("replaced {}:{} with {}:{}", key, written, key, value);
            if self.warn_invalid_metadata {
                self.warnings
                    .push(report_invalid_metadata(element.range, key, &written, &value));
            }
        }
        self.current_section().metadata.insert(key, value);
    }

    /// Measure that the next element belongs to, opened on demand
    fn current_measure(&mut self, from: usize) -> &mut Measure {
        if !self.started {
            self.started = true;
            let mut pickup = Measure::new(0);
            pickup.start = Some(from);
            self.current_section().measures.push(pickup);
        } else if !self.current_section().has_measures() {
            let measure = match self.unfinished.take() {
                Some(measure) => measure,
                None => {
                    self.counter += 1;
                    Measure::new(self.counter)
                }
            };
            self.current_section().measures.push(measure);
        }

        let section = self.current_section();
        let last = section.measures.len() - 1;
        &mut section.measures[last]
    }

    /// Close the current measure and open the next one
    ///
    /// When a header is followed by a barline, the empty measure carried over
    /// the header is reopened at that barline and keeps its index. Measure
    /// numbers stay consecutive across such headers: `| A |\nK:G\n| B |`
    /// numbers B's measure 2, not 3.
    fn push_barline(&mut self, element: GenericElement) {
        let barline = Barline::new(&element.raw_text, element.range);

        if !self.started {
            // A barline before any content opens the first measure
            self.started = true;
            self.counter = 1;
            self.current_section()
                .measures
                .push(Measure::after_barline(1, barline));
            return;
        }

        // A section opening with a barline re-opens the empty measure it
        // carried instead of closing it
        if !self.current_section().has_measures()
            && self.unfinished.as_ref().is_some_and(|m| m.events.is_empty())
        {
            if let Some(empty) = self.unfinished.take() {
                self.current_section()
                    .measures
                    .push(Measure::after_barline(empty.index, barline));
            }
            return;
        }

        let measure = self.current_measure(element.range.from);
        measure.end = Some(barline.range.from);
        measure.right_barline = Some(barline.clone());

        self.counter += 1;
        let next = Measure::after_barline(self.counter, barline);
        self.current_section().measures.push(next);
    }

    fn push_event(&mut self, event: Event) {
        let from = event.range().from;
        self.current_measure(from).events.push(event);
    }

    /// Close the stream and return the score with any metadata warnings
    pub fn finish(mut self) -> (Score, Vec<Diagnostic>) {
        if let Some(measure) = self.unfinished.take() {
            self.current_section().measures = vec![measure];
        }

        // Every barline opens a measure, so the last one is usually empty
        let section = self.current_section();
        if section.measures.last().is_some_and(|m| m.events.is_empty()) {
            section.measures.pop();
        }

        let score = Score {
            sections: self.sections,
        };
        (score, self.warnings)
    }
}

/// Build a score from a flat element stream
pub fn build_score(
    elements: impl IntoIterator<Item = Element>,
    defaults: Metadata,
    warn_invalid_metadata: bool,
) -> (Score, Vec<Diagnostic>) {
    let mut builder = StructureBuilder::new(defaults, warn_invalid_metadata);
    for element in elements {
        builder.push(element);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::elements::Note;
    use crate::models::elements::Rhythm;
    use crate::text::cursor::TextRange;

    fn header(raw: &str, from: usize) -> Element {
        Element::Metadata(GenericElement {
            name: "Metadata".into(),
            raw_text: raw.into(),
            range: TextRange::new(from, from + raw.len()),
        })
    }

    fn bar(raw: &str, from: usize) -> Element {
        Element::Barline(GenericElement {
            name: "Barline".into(),
            raw_text: raw.into(),
            range: TextRange::new(from, from + raw.len()),
        })
    }

    fn note(pitch: &str, from: usize) -> Element {
        Element::Event(Event::Note(Note {
            raw_text: pitch.into(),
            range: TextRange::new(from, from + pitch.len()),
            pitch: pitch.into(),
            accidental: String::new(),
            octave: String::new(),
            rhythm: Rhythm::default(),
            error_fragment: None,
            timing: None,
        }))
    }

    fn defaults() -> Metadata {
        [('K', "C"), ('L', "1/4"), ('M', "4/4"), ('Q', "120")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect()
    }

    fn build(elements: Vec<Element>) -> Score {
        build_score(elements, defaults(), false).0
    }

    #[test]
    fn test_leading_barline_opens_first_measure() {
        // "| A B |]"
        let score = build(vec![bar("|", 0), note("A", 2), note("B", 4), bar("|]", 6)]);
        let measures: Vec<_> = score.measures().collect();
        assert_eq!(measures.len(), 1);
        assert_eq!(measures[0].index, 1);
        assert_eq!(measures[0].start, Some(1));
        assert_eq!(measures[0].end, Some(6));
        assert_eq!(measures[0].left_barline.as_ref().unwrap().text, "|");
        assert_eq!(measures[0].right_barline.as_ref().unwrap().text, "|]");
    }

    #[test]
    fn test_pickup_before_first_barline() {
        // "A | B C |"
        let score = build(vec![note("A", 0), bar("|", 2), note("B", 4), note("C", 6), bar("|", 8)]);
        let measures: Vec<_> = score.measures().collect();
        assert_eq!(measures.len(), 2);
        assert_eq!(measures[0].index, 0);
        assert_eq!(measures[0].start, Some(0));
        assert!(measures[0].left_barline.is_none());
        assert_eq!(measures[1].index, 1);
        assert_eq!(measures[1].events.len(), 2);
    }

    #[test]
    fn test_metadata_opens_section_and_carries_open_measure() {
        // "| A B |\nK:G\nc d |]"
        let score = build(vec![
            bar("|", 0),
            note("A", 2),
            note("B", 4),
            bar("|", 6),
            note("c", 8),
            header("K:G", 10),
            note("d", 14),
            bar("|]", 16),
        ]);
        assert_eq!(score.sections.len(), 2);
        assert_eq!(score.sections[0].measures.len(), 1);
        assert_eq!(score.sections[1].metadata.get('K'), Some("G"));

        let carried = &score.sections[1].measures[0];
        assert_eq!(carried.index, 2);
        assert_eq!(carried.events.len(), 2);
        assert_eq!(carried.left_barline.as_ref().unwrap().text, "|");
    }

    #[test]
    fn test_section_opening_with_barline_has_no_empty_measure() {
        // "| A B |\nK:G\n| c d |]"
        let score = build(vec![
            bar("|", 0),
            note("A", 2),
            note("B", 4),
            bar("|", 6),
            header("K:G", 8),
            bar("|", 12),
            note("c", 14),
            note("d", 16),
            bar("|]", 18),
        ]);
        assert_eq!(score.sections.len(), 2);
        let second = &score.sections[1].measures;
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].index, 2);
        assert_eq!(second[0].start, Some(13));
        assert_eq!(second[0].events.len(), 2);
    }

    #[test]
    fn test_trailing_metadata_keeps_unfinished_measure() {
        let score = build(vec![bar("|", 0), note("A", 2), header("W:la", 4)]);
        assert_eq!(score.sections.len(), 2);
        assert!(score.sections[0].measures.is_empty());
        assert_eq!(score.sections[1].measures.len(), 1);
        assert_eq!(score.sections[1].measures[0].events.len(), 1);
    }

    #[test]
    fn test_metadata_before_music_stays_in_first_section() {
        let score = build(vec![header("X:1", 0), header("K:D", 4), bar("|", 8), note("A", 9)]);
        assert_eq!(score.sections.len(), 1);
        assert_eq!(score.sections[0].metadata.len(), 2);
        assert_eq!(score.measures().count(), 1);
    }

    #[test]
    fn test_invalid_metadata_is_replaced() {
        let (score, warnings) =
            build_score(vec![header("K:H", 0), header("M:7", 4)], defaults(), true);
        let md = &score.sections[0].metadata;
        assert_eq!(md.get('K'), Some("C"));
        assert_eq!(md.get('M'), Some("4/4"));
        assert_eq!(warnings.len(), 2);

        let (_, silent) = build_score(vec![header("K:H", 0)], defaults(), false);
        assert!(silent.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let score = build(Vec::new());
        assert_eq!(score.sections.len(), 1);
        assert_eq!(score.measures().count(), 0);
    }
}
