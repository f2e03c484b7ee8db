//! Barline handling
//!
//! A barline's text is kept verbatim as the measure boundary token; the
//! parsed type is informational.

use serde::{Deserialize, Serialize};

use crate::text::cursor::TextRange;

/// Barline types and handling
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarlineType {
    Single,      // |
    Double,      // ||
    Final,       // |]
    Thick,       // [|
    StartRepeat, // |:
    EndRepeat,   // :|
    DoubleRepeat, // ::
}

impl BarlineType {
    /// Parse barline from string
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "|" => Some(BarlineType::Single),
            "||" => Some(BarlineType::Double),
            "|]" => Some(BarlineType::Final),
            "[|" => Some(BarlineType::Thick),
            "|:" => Some(BarlineType::StartRepeat),
            ":|" => Some(BarlineType::EndRepeat),
            "::" | ":|:" | ":||:" => Some(BarlineType::DoubleRepeat),
            _ => None,
        }
    }
}

/// Barline token and position
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Barline {
    /// Text as written, emitted verbatim on output
    pub text: String,
    pub range: TextRange,
    pub barline_type: Option<BarlineType>,
}

impl Barline {
    /// Create new barline
    pub fn new(text: impl Into<String>, range: TextRange) -> Self {
        let text = text.into();
        let barline_type = BarlineType::parse(text.trim());
        Self {
            text,
            range,
            barline_type,
        }
    }
}
