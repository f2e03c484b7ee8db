//! Key signatures
//!
//! Recognizes the 15 major keys and their relative minors (case-insensitive)
//! and tells which pitch letters the signature alters.
//!
//! Note: `C`/`Am` appear on both sides of the circle with zero accidentals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order in which sharps are added to a key signature
const SHARP_ORDER: [char; 7] = ['f', 'c', 'g', 'd', 'a', 'e', 'b'];

/// Order in which flats are added to a key signature
const FLAT_ORDER: [char; 7] = ['b', 'e', 'a', 'd', 'g', 'c', 'f'];

/// A key signature as a count of sharps (positive) or flats (negative)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeySignature {
    pub fifths: i8,
}

impl KeySignature {
    pub fn new(fifths: i8) -> Self {
        Self {
            fifths: fifths.clamp(-7, 7),
        }
    }

    /// Accidental implied by the signature for a pitch letter:
    /// +1 sharp, -1 flat, 0 natural
    pub fn accidental_for(&self, letter: char) -> i32 {
        let letter = letter.to_ascii_lowercase();
        if self.fifths > 0 {
            let count = self.fifths as usize;
            i32::from(SHARP_ORDER[..count].contains(&letter))
        } else if self.fifths < 0 {
            let count = self.fifths.unsigned_abs() as usize;
            -i32::from(FLAT_ORDER[..count].contains(&letter))
        } else {
            0
        }
    }

    fn flats_for(name: &str) -> Option<i8> {
        match name {
            "c" | "am" => Some(0),
            "f" | "dm" => Some(1),
            "bb" | "gm" => Some(2),
            "eb" | "cm" => Some(3),
            "ab" | "fm" => Some(4),
            "db" | "bbm" => Some(5),
            "gb" | "ebm" => Some(6),
            "cb" | "abm" => Some(7),
            _ => None,
        }
    }

    fn sharps_for(name: &str) -> Option<i8> {
        match name {
            "c" | "am" => Some(0),
            "g" | "em" => Some(1),
            "d" | "bm" => Some(2),
            "a" | "f#m" => Some(3),
            "e" | "c#m" => Some(4),
            "b" | "g#m" => Some(5),
            "f#" | "d#m" => Some(6),
            "c#" | "a#m" => Some(7),
            _ => None,
        }
    }
}

impl FromStr for KeySignature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Case-insensitive, surrounding whitespace ignored
        let name = s.trim().to_lowercase();
        if let Some(flats) = Self::flats_for(&name) {
            return Ok(KeySignature::new(-flats));
        }
        if let Some(sharps) = Self::sharps_for(&name) {
            return Ok(KeySignature::new(sharps));
        }
        Err(format!("Invalid key: '{}'", s))
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fifths {
            0 => write!(f, "no accidentals"),
            n if n > 0 => write!(f, "{} sharp(s)", n),
            n => write!(f, "{} flat(s)", -n),
        }
    }
}

/// Whether a `K:` value names one of the recognized keys
pub fn is_valid_key(s: &str) -> bool {
    s.parse::<KeySignature>().is_ok()
}
