//! Measure fill classification

use super::{Diagnostic, DiagnosticSeverity};
use crate::models::score::{Measure, MeasureStatus};

/// Set a measure's status and completeness from its accumulated duration
///
/// The pickup is always valid. Otherwise the fill is checked first and the
/// closing barline last.
pub fn classify_measure(measure: &mut Measure, tolerance: f64) {
    let excess = measure.duration_f64() - 1.0;

    measure.is_complete = measure.is_pickup() || excess.abs() < tolerance;
    measure.status = if measure.is_pickup() {
        MeasureStatus::Valid
    } else if excess > tolerance {
        MeasureStatus::Overfilled
    } else if excess < -tolerance {
        MeasureStatus::Underfilled
    } else if !measure.is_terminated() {
        MeasureStatus::NoRightBarline
    } else {
        MeasureStatus::Valid
    };
}

/// Warning for a measure that is not valid
pub fn report_measure(measure: &Measure) -> Option<Diagnostic> {
    let detail = match measure.status {
        MeasureStatus::Valid => return None,
        MeasureStatus::Overfilled => format!(
            "holds {:.3} of a bar and is overfilled",
            measure.duration_f64()
        ),
        MeasureStatus::Underfilled => format!(
            "holds {:.3} of a bar and is underfilled",
            measure.duration_f64()
        ),
        MeasureStatus::NoRightBarline => "has no right barline".to_string(),
    };
    Some(Diagnostic::new(
        measure.span(),
        DiagnosticSeverity::Warning,
        "Measure",
        format!("Measure warning: measure {} {}.", measure.index, detail),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::barlines::Barline;
    use crate::text::cursor::TextRange;
    use crate::theory::Fraction;

    fn measure(index: usize, duration: Fraction, closed: bool) -> Measure {
        let mut m = Measure::after_barline(index, Barline::new("|", TextRange::new(0, 1)));
        m.duration = duration;
        if closed {
            m.right_barline = Some(Barline::new("|", TextRange::new(9, 10)));
            m.end = Some(9);
        }
        m
    }

    #[test]
    fn test_full_closed_measure_is_valid() {
        let mut m = measure(1, Fraction::from_integer(1), true);
        classify_measure(&mut m, 0.01);
        assert_eq!(m.status, MeasureStatus::Valid);
        assert!(m.is_complete);
        assert!(report_measure(&m).is_none());
    }

    #[test]
    fn test_fill_checks_come_before_barline() {
        let mut m = measure(2, Fraction::new(5, 4), false);
        classify_measure(&mut m, 0.01);
        assert_eq!(m.status, MeasureStatus::Overfilled);

        let mut m = measure(2, Fraction::new(3, 4), true);
        classify_measure(&mut m, 0.01);
        assert_eq!(m.status, MeasureStatus::Underfilled);
        assert!(!m.is_complete);

        let mut m = measure(2, Fraction::from_integer(1), false);
        classify_measure(&mut m, 0.01);
        assert_eq!(m.status, MeasureStatus::NoRightBarline);
        assert!(m.is_complete);
    }

    #[test]
    fn test_pickup_is_always_valid() {
        let mut m = Measure::new(0);
        m.duration = Fraction::new(1, 4);
        classify_measure(&mut m, 0.01);
        assert_eq!(m.status, MeasureStatus::Valid);
        assert!(m.is_complete);
    }

    #[test]
    fn test_warning_spans_measure() {
        let mut m = measure(3, Fraction::new(1, 2), true);
        classify_measure(&mut m, 0.01);
        let mark = report_measure(&m).unwrap();
        assert_eq!((mark.from, mark.to), (1, 9));
        assert_eq!(mark.severity, DiagnosticSeverity::Warning);
        assert!(mark.message.contains("measure 3"));
        assert!(mark.message.contains("underfilled"));
    }
}
