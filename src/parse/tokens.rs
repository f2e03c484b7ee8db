//! Token recognition
//!
//! Character classes and multi-character tokens of the sketch notation.

use crate::syntax::Ornament;

/// Barline spellings, longest first so greedy matching picks the right one
const BARLINES: [&str; 9] = [":||:", ":|:", "|]", "||", "[|", "|:", ":|", "::", "|"];

/// Length in bytes of the barline at the start of `rest`, if any
pub fn barline_len(rest: &str) -> Option<usize> {
    BARLINES
        .iter()
        .find(|barline| rest.starts_with(*barline))
        .map(|barline| barline.len())
}

/// `X:`, `K:`, `w:` ... at the start of a line
pub fn is_header_line(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(key), Some(':')) if key.is_ascii_alphabetic()
    )
}

pub fn is_accidental(c: char) -> bool {
    matches!(c, '^' | '_' | '=')
}

pub fn is_pitch_letter(c: char) -> bool {
    matches!(c, 'A'..='G' | 'a'..='g')
}

pub fn is_rest(c: char) -> bool {
    matches!(c, 'z' | 'x')
}

pub fn is_octave_mark(c: char) -> bool {
    matches!(c, ',' | '\'')
}

pub fn is_duration_char(c: char) -> bool {
    c.is_ascii_digit() || c == '/'
}

/// Broken-rhythm marks between two notes
pub fn is_dot_mark(c: char) -> bool {
    matches!(c, '>' | '<')
}

pub fn starts_note(c: char) -> bool {
    is_accidental(c) || is_pitch_letter(c)
}

/// Note, rest or chord
pub fn starts_musical(c: char) -> bool {
    starts_note(c) || is_rest(c) || c == '['
}

/// Single-character decoration
pub fn shorthand_ornament(c: char) -> Option<Ornament> {
    Ornament::from_shorthand(c)
}

/// Letters glued to a note that belong to no token
pub fn is_junk_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        && !is_pitch_letter(c)
        && !is_rest(c)
        && shorthand_ornament(c).is_none()
}

/// Characters that may begin a token of their own
pub fn starts_item(c: char) -> bool {
    c.is_whitespace()
        || starts_musical(c)
        || shorthand_ornament(c).is_some()
        || matches!(c, '%' | '|' | ':' | '!' | '(' | ')' | '-' | '"')
}
