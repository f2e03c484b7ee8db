//! Timing annotation
//!
//! Walks the score once, left to right, keeping the running metadata. Each
//! note, chord and rest receives its tick, measure fraction, length in
//! seconds, start time and pitch names; each measure receives the sum of its
//! events' measure fractions. Events whose length cannot be computed are
//! taken out of the score and handed back as error markers.

use std::mem;

use num_traits::CheckedDiv;

use crate::models::elements::{ErrorMarker, Event, PitchNotation, Rhythm, TimingInfo};
use crate::models::metadata::Metadata;
use crate::models::score::Score;
use crate::theory::{
    add_or_approximate, checked_product, dot_factor, extract_tempo, note_value_name,
    parse_duration_code, parse_meter, parse_unit_length, scientific_pitch, to_f64, Fraction,
    KeySignature, Meter,
};

/// Quarter-note tempo used until a valid `Q:` is seen
const FALLBACK_QUARTER_BPM: f64 = 120.0;

/// Musical context in effect for one section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingContext {
    pub key: KeySignature,
    /// Unit note length (`L:`)
    pub unit: Fraction,
    pub meter: Meter,
    pub quarter_bpm: f64,
}

impl Default for TimingContext {
    fn default() -> Self {
        Self {
            key: KeySignature::default(),
            unit: Fraction::new(1, 4),
            meter: Meter::default(),
            quarter_bpm: FALLBACK_QUARTER_BPM,
        }
    }
}

impl TimingContext {
    /// Context for effective metadata; values that fail to parse keep the
    /// previous context's value, so an established tempo persists
    pub fn update(&self, metadata: &Metadata) -> TimingContext {
        TimingContext {
            key: metadata
                .get('K')
                .and_then(|k| k.parse().ok())
                .unwrap_or(self.key),
            unit: metadata
                .get('L')
                .and_then(parse_unit_length)
                .unwrap_or(self.unit),
            meter: metadata.get('M').and_then(parse_meter).unwrap_or(self.meter),
            quarter_bpm: metadata
                .get('Q')
                .and_then(extract_tempo)
                .unwrap_or(self.quarter_bpm),
        }
    }

    /// Duration in beats of the meter's denominator
    ///
    /// `None` when the duration code is unreadable or out of range.
    pub fn tick(&self, rhythm: &Rhythm) -> Option<Fraction> {
        let multiplier = parse_duration_code(&rhythm.duration)?;
        let dotted = match rhythm.dot_direction() {
            Some(lengthen) => dot_factor(rhythm.dots(), lengthen),
            None => Fraction::from_integer(1),
        };
        checked_product(&[
            multiplier,
            self.unit,
            Fraction::from_integer(self.meter.denominator),
            dotted,
        ])
    }

    /// Timing for a note, chord or rest starting at `start_time`
    ///
    /// `None` for untimed events and for events whose length cannot be
    /// computed; [`Event::rhythm`] tells the two apart.
    pub fn timing(&self, event: &Event, start_time: f64) -> Option<TimingInfo> {
        let rhythm = event.rhythm()?;
        let tick = self.tick(rhythm)?;
        let measure_fraction = tick.checked_div(&Fraction::from_integer(self.meter.numerator))?;
        let quarters = to_f64(checked_product(&[tick, Fraction::new(4, self.meter.denominator)])?);

        let pitch = match event {
            Event::Note(note) => note.letter().map(|letter| {
                PitchNotation::Single(scientific_pitch(
                    letter,
                    &note.accidental,
                    &note.octave,
                    &self.key,
                ))
            }),
            Event::Chord(chord) => Some(PitchNotation::Chord(
                chord
                    .notes
                    .iter()
                    .filter_map(|note| {
                        let letter = note.letter()?;
                        Some(scientific_pitch(letter, &note.accidental, &note.octave, &self.key))
                    })
                    .collect(),
            )),
            _ => None,
        };

        Some(TimingInfo {
            tick,
            measure_fraction,
            seconds: quarters * 60.0 / self.quarter_bpm,
            start_time,
            pitch,
            note_value: note_value_name(quarters).map(str::to_string),
        })
    }
}

/// Annotate every timed event and measure of `score`
///
/// Returns the total length of the score in seconds, and a marker for each
/// event removed because its length could not be computed.
pub fn annotate(score: &mut Score, defaults: &Metadata) -> (f64, Vec<ErrorMarker>) {
    let mut running = defaults.clone();
    let mut context = TimingContext::default().update(&running);
    let mut clock = 0.0;
    let mut rejected = Vec::new();

    for section in &mut score.sections {
        running.merge_from(&section.metadata);
        context = context.update(&running);

        for measure in &mut section.measures {
            let mut duration = Fraction::from_integer(0);
            for mut event in mem::take(&mut measure.events) {
                let Some(timing) = context.timing(&event, clock) else {
                    if event.rhythm().is_some() {
                        log::warn!("dropping '{}': its length can't be computed", event.raw_text());
                        rejected.push(untimeable(&event));
                    } else {
                        measure.events.push(event);
                    }
                    continue;
                };
                duration = add_or_approximate(duration, timing.measure_fraction);
                clock += timing.seconds;
                event.set_timing(timing);
                measure.events.push(event);
            }
            measure.duration = duration;
        }
    }
    (clock, rejected)
}

fn untimeable(event: &Event) -> ErrorMarker {
    ErrorMarker {
        source: event.name().to_string(),
        raw_text: event.raw_text().to_string(),
        range: event.range(),
        error_fragment: None,
    }
}
