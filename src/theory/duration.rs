//! Duration codes, unit note lengths and meters

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Fraction;

static METER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)").expect("meter pattern is valid"));

/// Longest run of slashes or dots worth computing with
const MAX_HALVINGS: usize = 30;

/// Largest multiplier or divisor accepted in a duration code
pub const MAX_DURATION_TERM: i64 = 4096;

/// Largest numerator or denominator accepted in a meter
pub const MAX_METER_TERM: i64 = 1024;

/// Parse a note's duration code into a multiplier of the unit note length
///
/// - absent → 1
/// - `N` → N
/// - `/` → 1/2, `//` → 1/4, k slashes → 1/2^k
/// - `/N` → 1/N
/// - `N/M` → N/M, `N/` → N/2
///
/// Returns `None` for codes that do not describe a positive duration and
/// for terms above [`MAX_DURATION_TERM`].
pub fn parse_duration_code(code: &str) -> Option<Fraction> {
    let code = code.trim();
    if code.is_empty() {
        return Some(Fraction::from_integer(1));
    }

    let Some(slash) = code.find('/') else {
        let n: i64 = code.parse().ok()?;
        return in_duration_range(n).then(|| Fraction::from_integer(n));
    };

    let numer: i64 = if slash == 0 { 1 } else { code[..slash].parse().ok()? };
    let rest = &code[slash..];
    let slashes = rest.chars().take_while(|c| *c == '/').count();
    let tail = &rest[slashes..];

    let denom: i64 = if tail.is_empty() {
        if slashes > MAX_HALVINGS {
            return None;
        }
        1i64 << slashes
    } else if slashes == 1 {
        tail.parse().ok()?
    } else {
        return None;
    };

    (in_duration_range(numer) && in_duration_range(denom)).then(|| Fraction::new(numer, denom))
}

fn in_duration_range(term: i64) -> bool {
    term > 0 && term <= MAX_DURATION_TERM
}

/// Parse an `L:` value; only 1/1 through 1/512 are accepted
pub fn parse_unit_length(value: &str) -> Option<Fraction> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let (numer, denom) = compact.split_once('/')?;
    let numer: i64 = numer.parse().ok()?;
    let denom: i64 = denom.parse().ok()?;

    if numer == 1 && denom > 0 && denom <= 512 && (denom & (denom - 1)) == 0 {
        Some(Fraction::new(1, denom))
    } else {
        None
    }
}

pub fn is_valid_unit_length(value: &str) -> bool {
    parse_unit_length(value).is_some()
}

/// Time signature `numerator/denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Meter {
    pub numerator: i64,
    pub denominator: i64,
}

impl Meter {
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

impl Default for Meter {
    fn default() -> Self {
        Meter::new(4, 4)
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Parse an `M:` value; the first `int/int` wins and surrounding text is tolerated
pub fn parse_meter(value: &str) -> Option<Meter> {
    let caps = METER_RE.captures(value)?;
    let numerator: i64 = caps[1].parse().ok()?;
    let denominator: i64 = caps[2].parse().ok()?;
    let in_range = |term: i64| term > 0 && term <= MAX_METER_TERM;
    (in_range(numerator) && in_range(denominator)).then(|| Meter::new(numerator, denominator))
}

pub fn is_valid_meter(value: &str) -> bool {
    parse_meter(value).is_some()
}

/// Scale factor for one half of a dotted pair
///
/// The lengthened partner gets `2 - 2^-dots`, the other `2^-dots`; the pair
/// as a whole keeps the length of the undotted pair.
pub fn dot_factor(dots: usize, lengthen: bool) -> Fraction {
    let pow = 1i64 << dots.min(MAX_HALVINGS);
    if lengthen {
        Fraction::new(2 * pow - 1, pow)
    } else {
        Fraction::new(1, pow)
    }
}

/// Relative note-value name for a duration in quarter notes
///
/// Returns names like `"4n"` (quarter) or `"8n."` (dotted eighth), `None`
/// for durations with no plain or single-dotted name (tuplets etc.)
///
/// # Examples
/// ```
/// use abc_sketch_wasm::theory::note_value_name;
///
/// assert_eq!(note_value_name(1.0), Some("4n"));
/// assert_eq!(note_value_name(0.75), Some("8n."));
/// ```
pub fn note_value_name(quarters: f64) -> Option<&'static str> {
    const EPSILON: f64 = 0.001;
    const NAMES: [(f64, &str); 12] = [
        (6.0, "1n."),
        (4.0, "1n"),
        (3.0, "2n."),
        (2.0, "2n"),
        (1.5, "4n."),
        (1.0, "4n"),
        (0.75, "8n."),
        (0.5, "8n"),
        (0.375, "16n."),
        (0.25, "16n"),
        (0.1875, "32n."),
        (0.125, "32n"),
    ];

    NAMES
        .iter()
        .find(|(value, _)| (quarters - value).abs() < EPSILON)
        .map(|(_, name)| *name)
}
