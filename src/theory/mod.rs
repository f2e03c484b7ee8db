//! Tiny theory: key signatures, durations, tempo and pitch spelling
//!
//! Pure functions with no external state. Everything that feeds timing is
//! computed on explicit rationals; floats only appear at the very end
//! (seconds, measure-fill checks).

pub mod duration;
pub mod key;
pub mod pitch;
pub mod tempo;

pub use duration::{
    dot_factor, is_valid_meter, is_valid_unit_length, note_value_name, parse_duration_code,
    parse_meter, parse_unit_length, Meter,
};
pub use key::{is_valid_key, KeySignature};
pub use pitch::{scientific_pitch, Accidental};
pub use tempo::{extract_tempo, is_valid_tempo};

use num_traits::{CheckedAdd, CheckedMul};

/// Exact durations and beat fractions
pub type Fraction = num_rational::Rational64;

/// Convert a fraction to a float for display and tolerance checks
pub fn to_f64(value: Fraction) -> f64 {
    *value.numer() as f64 / *value.denom() as f64
}

/// Product of all factors, `None` when it overflows `i64`
pub fn checked_product(factors: &[Fraction]) -> Option<Fraction> {
    factors
        .iter()
        .try_fold(Fraction::from_integer(1), |acc, factor| acc.checked_mul(factor))
}

/// `a + b`, approximated through a float when the exact sum overflows `i64`
///
/// Co-prime denominators in one measure make the exact sum's denominator
/// grow with their product.
pub fn add_or_approximate(a: Fraction, b: Fraction) -> Fraction {
    a.checked_add(&b).unwrap_or_else(|| {
        let sum = to_f64(a) + to_f64(b);
        log::debug!("exact sum of {} and {} overflows, approximating {}", a, b, sum);
        Fraction::approximate_float(sum).unwrap_or(a)
    })
}
