//! Playback schedule and cursor status
//!
//! Flattens the timed score into what a synthesizer needs: one entry per
//! note, chord or rest with its pitches, start time and length in seconds.

use serde::{Deserialize, Serialize};

use crate::models::elements::Event;
use crate::models::score::Score;
use crate::structure::position::CursorLocation;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlaybackEvent {
    /// Scientific pitches; empty for rests
    pub notes: Vec<String>,
    /// Start time in seconds
    pub time: f64,
    /// Length in seconds
    pub duration: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Playback {
    pub events: Vec<PlaybackEvent>,
    /// Total length in seconds
    pub duration: f64,
}

/// Loop points in seconds
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LoopRegion {
    pub start: f64,
    pub end: f64,
}

/// Playback schedule for an annotated score
pub fn schedule(score: &Score) -> Playback {
    let mut playback = Playback::default();
    for event in score.events() {
        let Some(timing) = event.timing() else {
            continue;
        };
        playback.events.push(PlaybackEvent {
            notes: timing.pitch.as_ref().map(|p| p.names()).unwrap_or_default(),
            time: timing.start_time,
            duration: timing.seconds,
        });
        playback.duration = playback.duration.max(timing.start_time + timing.seconds);
    }
    playback
}

/// Loop points covering the measure under the cursor
pub fn loop_region(score: &Score, location: &CursorLocation) -> Option<LoopRegion> {
    let measure = location.measure(score)?;
    let first = measure.timed_events().find_map(Event::timing)?;
    let last = measure.timed_events().filter_map(Event::timing).last()?;
    Some(LoopRegion {
        start: first.start_time,
        end: last.start_time + last.seconds,
    })
}

/// Status line text: `Measure 3 (Valid) -- Note F#5, 8n`
pub fn describe_location(score: &Score, location: &CursorLocation) -> String {
    let mut parts = Vec::new();

    if let Some(measure) = location.measure(score) {
        let status = if measure.is_pickup() {
            "Pickup"
        } else {
            measure.status.as_str()
        };
        parts.push(format!("Measure {} ({})", measure.index, status));
    }

    if let Some(event) = location.event(score) {
        let mut text = event.name().to_string();
        if let Some(timing) = event.timing() {
            let mut details = Vec::new();
            if let Some(pitch) = &timing.pitch {
                details.push(pitch.display());
            }
            if let Some(value) = &timing.note_value {
                details.push(value.clone());
            }
            if !details.is_empty() {
                text.push(' ');
                text.push_str(&details.join(", "));
            }
        }
        parts.push(text);
    }

    parts.join(" -- ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::elements::{Note, PitchNotation, Rest, Rhythm, TimingInfo};
    use crate::models::score::{Measure, MeasureStatus, Section};
    use crate::structure::position::{EventRef, MeasureRef};
    use crate::text::cursor::TextRange;
    use crate::theory::Fraction;

    fn timing(start: f64, seconds: f64, pitch: Option<&str>) -> TimingInfo {
        TimingInfo {
            tick: Fraction::new(1, 2),
            measure_fraction: Fraction::new(1, 8),
            seconds,
            start_time: start,
            pitch: pitch.map(|p| PitchNotation::Single(p.to_string())),
            note_value: Some("8n".to_string()),
        }
    }

    fn score() -> Score {
        let mut measure = Measure::new(3);
        measure.status = MeasureStatus::Valid;
        measure.events.push(Event::Note(Note {
            raw_text: "f/".into(),
            range: TextRange::new(4, 6),
            pitch: "f".into(),
            accidental: String::new(),
            octave: String::new(),
            rhythm: Rhythm::default(),
            error_fragment: None,
            timing: Some(timing(2.0, 0.25, Some("F#5"))),
        }));
        measure.events.push(Event::Rest(Rest {
            raw_text: "z/".into(),
            range: TextRange::new(6, 8),
            rhythm: Rhythm::default(),
            error_fragment: None,
            timing: Some(timing(2.25, 0.25, None)),
        }));
        let mut section = Section::new();
        section.measures.push(measure);
        Score {
            sections: vec![section],
        }
    }

    fn location() -> CursorLocation {
        CursorLocation {
            measures: vec![MeasureRef {
                section: 0,
                position: 0,
                index: 3,
            }],
            events: vec![EventRef {
                section: 0,
                measure: 0,
                event: 0,
            }],
        }
    }

    #[test]
    fn test_schedule() {
        let playback = schedule(&score());
        assert_eq!(playback.events.len(), 2);
        assert_eq!(playback.events[0].notes, vec!["F#5".to_string()]);
        assert!(playback.events[1].notes.is_empty());
        assert!((playback.duration - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_loop_region() {
        let region = loop_region(&score(), &location()).unwrap();
        assert_eq!(region.start, 2.0);
        assert!((region.end - 2.5).abs() < 1e-9);
        assert!(loop_region(&score(), &CursorLocation::default()).is_none());
    }

    #[test]
    fn test_describe_location() {
        assert_eq!(
            describe_location(&score(), &location()),
            "Measure 3 (Valid) -- Note F#5, 8n"
        );
        assert_eq!(describe_location(&score(), &CursorLocation::default()), "");
    }
}
