//! Tempo (`Q:`) extraction
//!
//! A tempo string is scanned for `N` and `N/M` tokens. Valid forms are zero or
//! more beat fractions followed by exactly one plain integer, the bpm of the
//! listed beats: `120`, `1/4=120`, `1/4 1/8=120`, `"Allegro" 3/8=60`.

use num_traits::CheckedAdd;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{checked_product, to_f64, Fraction};

static TEMPO_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:/\d+)?").expect("tempo pattern is valid"));

/// Largest bpm or beat term accepted
const MAX_TEMPO_TERM: i64 = 10_000;

/// Beat assumed when the tempo string only gives a bpm
fn default_beat() -> Fraction {
    Fraction::new(1, 4)
}

/// Equivalent quarter-note bpm of a tempo string, `None` when malformed or
/// when a term exceeds the accepted range
pub fn extract_tempo(value: &str) -> Option<f64> {
    let tokens: Vec<&str> = TEMPO_TOKEN_RE
        .find_iter(value)
        .map(|m| m.as_str())
        .collect();

    let (bpm_token, beat_tokens) = tokens.split_last()?;
    if bpm_token.contains('/') || beat_tokens.iter().any(|t| !t.contains('/')) {
        return None;
    }

    let bpm: i64 = bpm_token.parse().ok()?;
    if bpm <= 0 || bpm > MAX_TEMPO_TERM {
        return None;
    }

    let mut beats = Fraction::from_integer(0);
    for token in beat_tokens {
        let (numer, denom) = token.split_once('/')?;
        let numer: i64 = numer.parse().ok()?;
        let denom: i64 = denom.parse().ok()?;
        if denom == 0 || numer > MAX_TEMPO_TERM || denom > MAX_TEMPO_TERM {
            return None;
        }
        beats = beats.checked_add(&Fraction::new(numer, denom))?;
    }
    if beat_tokens.is_empty() {
        beats = default_beat();
    }

    let quarter_bpm = checked_product(&[Fraction::from_integer(bpm), beats, Fraction::from_integer(4)])?;
    let quarter_bpm = to_f64(quarter_bpm);
    (quarter_bpm > 0.0).then_some(quarter_bpm)
}

pub fn is_valid_tempo(value: &str) -> bool {
    extract_tempo(value).is_some()
}
