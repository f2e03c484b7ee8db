//! Score elements
//!
//! The classifier turns every top-level syntax node into one or more
//! [`Element`]s. Metadata and barlines steer the structure builder; events end
//! up inside measures; error markers only ever become diagnostics.

use serde::{Deserialize, Serialize};

use crate::syntax::Ornament;
use crate::text::cursor::TextRange;
use crate::theory::Fraction;

/// Fields shared by everything that takes musical time
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Rhythm {
    /// Written duration code (`2`, `/`, `3/2`, ...); empty means 1
    pub duration: String,
    /// Dot run this item follows as second half of a dotted pair
    pub pre_dot: String,
    /// Dot run this item precedes as first half of a dotted pair
    pub post_dot: String,
}

impl Rhythm {
    /// Number of dot marks affecting this item
    pub fn dots(&self) -> usize {
        self.pre_dot.chars().count().max(self.post_dot.chars().count())
    }

    /// `Some(true)` if lengthened by its dotted pair, `Some(false)` if
    /// shortened, `None` when not part of a pair
    pub fn dot_direction(&self) -> Option<bool> {
        let pre = self.pre_dot.chars().next();
        let post = self.post_dot.chars().next();
        if pre == Some('<') || post == Some('>') {
            Some(true)
        } else if pre == Some('>') || post == Some('<') {
            Some(false)
        } else {
            None
        }
    }
}

/// Scientific pitch of a note, or of every note of a chord
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum PitchNotation {
    Single(String),
    Chord(Vec<String>),
}

impl PitchNotation {
    pub fn names(&self) -> Vec<String> {
        match self {
            PitchNotation::Single(name) => vec![name.clone()],
            PitchNotation::Chord(names) => names.clone(),
        }
    }

    /// Display form: `F#5` or `[C4 E4 G4]`
    pub fn display(&self) -> String {
        match self {
            PitchNotation::Single(name) => name.clone(),
            PitchNotation::Chord(names) => format!("[{}]", names.join(" ")),
        }
    }
}

/// Musical timing attached to notes, chords and rests
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimingInfo {
    /// Duration in units of the meter's beat note
    pub tick: Fraction,
    /// Portion of a full measure; 1 means the measure is full
    pub measure_fraction: Fraction,
    pub seconds: f64,
    /// Running start time within the score, in seconds
    pub start_time: f64,
    /// `None` for rests
    pub pitch: Option<PitchNotation>,
    /// Relative note value (`4n`, `8n.`), when it has a plain name
    pub note_value: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Note {
    pub raw_text: String,
    pub range: TextRange,
    /// Pitch letter as written (case selects the octave)
    pub pitch: String,
    pub accidental: String,
    pub octave: String,
    pub rhythm: Rhythm,
    /// Broken fragment embedded in an otherwise valid note
    pub error_fragment: Option<String>,
    pub timing: Option<TimingInfo>,
}

impl Note {
    pub fn letter(&self) -> Option<char> {
        self.pitch.chars().next()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Chord {
    /// Canonical text: `[` + member texts + `]`
    pub raw_text: String,
    pub range: TextRange,
    /// Member notes in written order; all share the first note's duration
    pub notes: Vec<Note>,
    pub rhythm: Rhythm,
    pub timing: Option<TimingInfo>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Rest {
    pub raw_text: String,
    pub range: TextRange,
    pub rhythm: Rhythm,
    pub error_fragment: Option<String>,
    pub timing: Option<TimingInfo>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Decoration {
    pub raw_text: String,
    pub range: TextRange,
    /// Humanized ornament name ("Staccato Mark"), or "Decoration"
    pub name: String,
    pub ornament: Option<Ornament>,
}

/// Any node passed through verbatim: metadata, barlines, slurs, ties, ...
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GenericElement {
    pub name: String,
    pub raw_text: String,
    pub range: TextRange,
}

/// Malformed input; never serialized, always reported
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorMarker {
    /// Kind of the node that failed to classify
    pub source: String,
    pub raw_text: String,
    pub range: TextRange,
    pub error_fragment: Option<String>,
}

/// Content of a measure
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind")]
pub enum Event {
    Note(Note),
    Chord(Chord),
    Rest(Rest),
    Decoration(Decoration),
    Other(GenericElement),
}

impl Event {
    /// Display name of the event
    pub fn name(&self) -> &str {
        match self {
            Event::Note(_) => "Note",
            Event::Chord(_) => "Chord",
            Event::Rest(_) => "Rest",
            Event::Decoration(d) => &d.name,
            Event::Other(g) => &g.name,
        }
    }

    pub fn raw_text(&self) -> &str {
        match self {
            Event::Note(n) => &n.raw_text,
            Event::Chord(c) => &c.raw_text,
            Event::Rest(r) => &r.raw_text,
            Event::Decoration(d) => &d.raw_text,
            Event::Other(g) => &g.raw_text,
        }
    }

    pub fn raw_text_mut(&mut self) -> &mut String {
        match self {
            Event::Note(n) => &mut n.raw_text,
            Event::Chord(c) => &mut c.raw_text,
            Event::Rest(r) => &mut r.raw_text,
            Event::Decoration(d) => &mut d.raw_text,
            Event::Other(g) => &mut g.raw_text,
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            Event::Note(n) => n.range,
            Event::Chord(c) => c.range,
            Event::Rest(r) => r.range,
            Event::Decoration(d) => d.range,
            Event::Other(g) => g.range,
        }
    }

    pub fn range_mut(&mut self) -> &mut TextRange {
        match self {
            Event::Note(n) => &mut n.range,
            Event::Chord(c) => &mut c.range,
            Event::Rest(r) => &mut r.range,
            Event::Decoration(d) => &mut d.range,
            Event::Other(g) => &mut g.range,
        }
    }

    /// Rhythm of notes, chords and rests
    pub fn rhythm(&self) -> Option<&Rhythm> {
        match self {
            Event::Note(n) => Some(&n.rhythm),
            Event::Chord(c) => Some(&c.rhythm),
            Event::Rest(r) => Some(&r.rhythm),
            Event::Decoration(_) | Event::Other(_) => None,
        }
    }

    pub fn rhythm_mut(&mut self) -> Option<&mut Rhythm> {
        match self {
            Event::Note(n) => Some(&mut n.rhythm),
            Event::Chord(c) => Some(&mut c.rhythm),
            Event::Rest(r) => Some(&mut r.rhythm),
            Event::Decoration(_) | Event::Other(_) => None,
        }
    }

    pub fn timing(&self) -> Option<&TimingInfo> {
        match self {
            Event::Note(n) => n.timing.as_ref(),
            Event::Chord(c) => c.timing.as_ref(),
            Event::Rest(r) => r.timing.as_ref(),
            Event::Decoration(_) | Event::Other(_) => None,
        }
    }

    pub fn set_timing(&mut self, timing: TimingInfo) {
        match self {
            Event::Note(n) => n.timing = Some(timing),
            Event::Chord(c) => c.timing = Some(timing),
            Event::Rest(r) => r.timing = Some(timing),
            Event::Decoration(_) | Event::Other(_) => {}
        }
    }

    pub fn error_fragment(&self) -> Option<&str> {
        match self {
            Event::Note(n) => n.error_fragment.as_deref(),
            Event::Rest(r) => r.error_fragment.as_deref(),
            Event::Chord(_) | Event::Decoration(_) | Event::Other(_) => None,
        }
    }

    /// Notes, chords and rests take time
    pub fn is_timed(&self) -> bool {
        self.rhythm().is_some()
    }
}

/// Output of the classifier for one syntax node
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Element {
    Metadata(GenericElement),
    Barline(GenericElement),
    Event(Event),
    Error(ErrorMarker),
}
