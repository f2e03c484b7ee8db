//! Node kinds produced by the ABC grammar
//!
//! Kind names are the grammar's node names (`Note`, `Barline`, `⚠`, ...).
//! Anything the engine does not know about is kept as [`NodeKind::Other`]
//! and passed through as a generic element.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name the grammar gives to error-recovery nodes
pub const ERROR_NODE_NAME: &str = "⚠";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of the document
    Program,
    /// `% ...` line
    Comment,
    /// `K:G` style header line
    Metadata,
    Barline,
    Note,
    Rest,
    Chord,
    /// Two musical items joined by a `>`/`<` run
    DottedRhythm,
    /// The `>`/`<` run inside a dotted rhythm
    Dot,
    Decoration,
    /// Recognized ornament inside a decoration
    Ornament(Ornament),
    Pitch,
    Accidental,
    Octave,
    Duration,
    /// Error-recovery node (`⚠`)
    Error,
    /// Any node kind the engine has no dedicated handling for
    Other(String),
}

impl NodeKind {
    /// Map a grammar node name to its kind
    pub fn from_name(name: &str) -> NodeKind {
        match name {
            "Program" => NodeKind::Program,
            "Comment" => NodeKind::Comment,
            "Metadata" => NodeKind::Metadata,
            "Barline" => NodeKind::Barline,
            "Note" => NodeKind::Note,
            "Rest" => NodeKind::Rest,
            "Chord" => NodeKind::Chord,
            "DottedRhythm" => NodeKind::DottedRhythm,
            "Dot" => NodeKind::Dot,
            "Decoration" => NodeKind::Decoration,
            "Pitch" => NodeKind::Pitch,
            "Accidental" => NodeKind::Accidental,
            "Octave" => NodeKind::Octave,
            "Duration" => NodeKind::Duration,
            ERROR_NODE_NAME => NodeKind::Error,
            other => match Ornament::from_node_name(other) {
                Some(ornament) => NodeKind::Ornament(ornament),
                None => NodeKind::Other(other.to_string()),
            },
        }
    }

    /// The grammar node name for this kind
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Comment => "Comment",
            NodeKind::Metadata => "Metadata",
            NodeKind::Barline => "Barline",
            NodeKind::Note => "Note",
            NodeKind::Rest => "Rest",
            NodeKind::Chord => "Chord",
            NodeKind::DottedRhythm => "DottedRhythm",
            NodeKind::Dot => "Dot",
            NodeKind::Decoration => "Decoration",
            NodeKind::Ornament(ornament) => ornament.node_name(),
            NodeKind::Pitch => "Pitch",
            NodeKind::Accidental => "Accidental",
            NodeKind::Octave => "Octave",
            NodeKind::Duration => "Duration",
            NodeKind::Error => ERROR_NODE_NAME,
            NodeKind::Other(name) => name,
        }
    }

    /// Node kinds that never reach the classifier
    pub fn is_trivia(&self) -> bool {
        matches!(self, NodeKind::Program | NodeKind::Comment)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decorations the grammar recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ornament {
    StaccatoMark,
    Roll,
    Fermata,
    Trill,
    Accent,
    LowerMordent,
    UpperMordent,
    Segno,
    Coda,
    UpBow,
    DownBow,
    Tenuto,
}

impl Ornament {
    pub const ALL: [Ornament; 12] = [
        Ornament::StaccatoMark,
        Ornament::Roll,
        Ornament::Fermata,
        Ornament::Trill,
        Ornament::Accent,
        Ornament::LowerMordent,
        Ornament::UpperMordent,
        Ornament::Segno,
        Ornament::Coda,
        Ornament::UpBow,
        Ornament::DownBow,
        Ornament::Tenuto,
    ];

    pub fn node_name(&self) -> &'static str {
        match self {
            Ornament::StaccatoMark => "StaccatoMark",
            Ornament::Roll => "Roll",
            Ornament::Fermata => "Fermata",
            Ornament::Trill => "Trill",
            Ornament::Accent => "Accent",
            Ornament::LowerMordent => "LowerMordent",
            Ornament::UpperMordent => "UpperMordent",
            Ornament::Segno => "Segno",
            Ornament::Coda => "Coda",
            Ornament::UpBow => "UpBow",
            Ornament::DownBow => "DownBow",
            Ornament::Tenuto => "Tenuto",
        }
    }

    pub fn from_node_name(name: &str) -> Option<Ornament> {
        Ornament::ALL.iter().copied().find(|o| o.node_name() == name)
    }

    /// Single-character shorthand (`.`, `~`, `H`, ...)
    pub fn from_shorthand(ch: char) -> Option<Ornament> {
        match ch {
            '.' => Some(Ornament::StaccatoMark),
            '~' => Some(Ornament::Roll),
            'H' => Some(Ornament::Fermata),
            'T' => Some(Ornament::Trill),
            'L' => Some(Ornament::Accent),
            'M' => Some(Ornament::LowerMordent),
            'P' => Some(Ornament::UpperMordent),
            'S' => Some(Ornament::Segno),
            'O' => Some(Ornament::Coda),
            'u' => Some(Ornament::UpBow),
            'v' => Some(Ornament::DownBow),
            _ => None,
        }
    }

    /// Long form between exclamation marks (`!trill!`)
    pub fn from_long_name(name: &str) -> Option<Ornament> {
        match name {
            "staccato" => Some(Ornament::StaccatoMark),
            "roll" => Some(Ornament::Roll),
            "fermata" => Some(Ornament::Fermata),
            "trill" => Some(Ornament::Trill),
            "accent" | ">" | "emphasis" => Some(Ornament::Accent),
            "lowermordent" | "mordent" => Some(Ornament::LowerMordent),
            "uppermordent" | "pralltriller" => Some(Ornament::UpperMordent),
            "segno" => Some(Ornament::Segno),
            "coda" => Some(Ornament::Coda),
            "upbow" => Some(Ornament::UpBow),
            "downbow" => Some(Ornament::DownBow),
            "tenuto" => Some(Ornament::Tenuto),
            _ => None,
        }
    }
}
