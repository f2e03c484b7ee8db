//! Scientific pitch spelling
//!
//! ABC writes a pitch as accidental marks (`^`, `_`, `=`), a letter whose case
//! selects the octave, and octave marks (`,` down, `'` up). The scientific
//! name is letter + accidental + octave number, e.g. `^f'` → `F#6`.

use serde::{Deserialize, Serialize};

use super::key::KeySignature;

/// Resolved accidental, clamped to double-flat ..= double-sharp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    /// Clamp a semitone offset into the five-symbol range
    pub fn from_offset(offset: i32) -> Self {
        match offset.clamp(-2, 2) {
            -2 => Accidental::DoubleFlat,
            -1 => Accidental::Flat,
            0 => Accidental::Natural,
            1 => Accidental::Sharp,
            _ => Accidental::DoubleSharp,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "x",
        }
    }
}

/// Accidental after applying the key signature and the written marks
pub fn resolve_accidental(letter: char, marks: &str, key: &KeySignature) -> Accidental {
    if marks.contains('=') {
        return Accidental::Natural;
    }
    let sharps = marks.matches('^').count() as i32;
    let flats = marks.matches('_').count() as i32;
    Accidental::from_offset(key.accidental_for(letter) + sharps - flats)
}

/// Octave number: 4 for `C`..`B`, 5 for `c`..`b`, adjusted by octave marks
pub fn octave_number(letter: char, octave_marks: &str) -> i32 {
    let base = if letter.is_ascii_lowercase() { 5 } else { 4 };
    let down = octave_marks.matches(',').count() as i32;
    let up = octave_marks.matches('\'').count() as i32;
    base - down + up
}

/// Scientific pitch name for a written note
pub fn scientific_pitch(
    letter: char,
    accidental_marks: &str,
    octave_marks: &str,
    key: &KeySignature,
) -> String {
    let accidental = resolve_accidental(letter, accidental_marks, key);
    format!(
        "{}{}{}",
        letter.to_ascii_uppercase(),
        accidental.symbol(),
        octave_number(letter, octave_marks)
    )
}
