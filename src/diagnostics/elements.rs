//! Diagnostics for elements that could not be processed
//!
//! Error markers are reported over their whole span. A broken fragment
//! embedded in an otherwise valid note narrows the mark to the fragment and
//! is cut out of the event's raw text, so serialized output stays clean.

use super::{Diagnostic, DiagnosticSeverity};
use crate::models::elements::{ErrorMarker, Event};
use crate::text::cursor::TextRange;

/// Error for an element the classifier rejected
///
/// Returns `None` for zero-width markers (an empty chord's placeholder note).
pub fn report_error_marker(marker: &ErrorMarker) -> Option<Diagnostic> {
    if marker.range.is_empty() {
        return None;
    }
    let mut raw_text = marker.raw_text.clone();
    let (range, text) = locate_fragment(
        &mut raw_text,
        marker.range,
        marker.error_fragment.as_deref(),
    );
    let message = format!("ABC error: '{}' can't be processed and is ignored.", text);
    Some(
        Diagnostic::new(range, DiagnosticSeverity::Error, &marker.source, message)
            .with_delete_fix(),
    )
}

/// Warning for a valid event carrying a broken fragment; repairs the raw text
pub fn report_embedded_fragment(event: &mut Event) -> Option<Diagnostic> {
    let fragment = event.error_fragment()?.to_string();
    let range = event.range();
    if range.is_empty() {
        return None;
    }
    let name = event.name().to_string();
    let (range, text) = locate_fragment(event.raw_text_mut(), range, Some(&fragment));
    let message = format!(
        "{} warning: '{}' can't be processed and is ignored.",
        name, text
    );
    log::debug!("repaired {} at {}..{}", name, range.from, range.to);
    Some(Diagnostic::new(range, DiagnosticSeverity::Warning, name, message).with_delete_fix())
}

/// Warning for a header value that was replaced by the default
pub fn report_invalid_metadata(
    range: TextRange,
    key: char,
    written: &str,
    replacement: &str,
) -> Diagnostic {
    Diagnostic::new(
        range,
        DiagnosticSeverity::Warning,
        "Metadata",
        format!(
            "Metadata warning: '{}:{}' is not valid, using '{}:{}' instead.",
            key, written, key, replacement
        ),
    )
}

/// Narrow `range` to the first occurrence of `fragment` in `raw_text` and
/// remove it from the text. Returns the span and the text to quote.
fn locate_fragment(
    raw_text: &mut String,
    range: TextRange,
    fragment: Option<&str>,
) -> (TextRange, String) {
    let Some(fragment) = fragment.filter(|f| !f.is_empty()) else {
        return (range, raw_text.clone());
    };
    match raw_text.find(fragment) {
        Some(offset) => {
            let from = range.from + offset;
            raw_text.replace_range(offset..offset + fragment.len(), "");
            (TextRange::new(from, from + fragment.len()), fragment.to_string())
        }
        None => (range, raw_text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticFix;
    use crate::models::elements::{Note, Rhythm};

    fn note_with_fragment(raw: &str, from: usize, fragment: &str) -> Event {
        Event::Note(Note {
            raw_text: raw.to_string(),
            range: TextRange::new(from, from + raw.len()),
            pitch: "a".to_string(),
            accidental: String::new(),
            octave: String::new(),
            rhythm: Rhythm::default(),
            error_fragment: Some(fragment.to_string()),
            timing: None,
        })
    }

    #[test]
    fn test_error_marker_spans_whole_token() {
        let marker = ErrorMarker {
            source: "Note".to_string(),
            raw_text: "^".to_string(),
            range: TextRange::new(6, 7),
            error_fragment: None,
        };
        let mark = report_error_marker(&marker).unwrap();
        assert_eq!((mark.from, mark.to), (6, 7));
        assert_eq!(mark.severity, DiagnosticSeverity::Error);
        assert_eq!(mark.message, "ABC error: '^' can't be processed and is ignored.");
        assert_eq!(mark.fix, Some(DiagnosticFix::DeleteSpan { from: 6, to: 7 }));
    }

    #[test]
    fn test_zero_width_marker_is_silent() {
        let marker = ErrorMarker {
            source: "Chord".to_string(),
            raw_text: String::new(),
            range: TextRange::at(3),
            error_fragment: None,
        };
        assert!(report_error_marker(&marker).is_none());
    }

    #[test]
    fn test_embedded_fragment_narrows_and_repairs() {
        // "assss2" => "ssss" is broken, "a2" is a valid note
        let mut event = note_with_fragment("assss2", 10, "ssss");
        let mark = report_embedded_fragment(&mut event).unwrap();
        assert_eq!((mark.from, mark.to), (11, 15));
        assert_eq!(mark.severity, DiagnosticSeverity::Warning);
        assert_eq!(mark.source, "Note");
        assert!(mark.message.starts_with("Note warning: 'ssss'"));
        assert_eq!(event.raw_text(), "a2");
    }

    #[test]
    fn test_missing_fragment_keeps_full_span() {
        let mut event = note_with_fragment("a2", 0, "zz");
        let mark = report_embedded_fragment(&mut event).unwrap();
        assert_eq!((mark.from, mark.to), (0, 2));
        assert_eq!(event.raw_text(), "a2");
    }

    #[test]
    fn test_invalid_metadata_warning() {
        let mark = report_invalid_metadata(TextRange::new(0, 3), 'K', "H", "C");
        assert_eq!(mark.severity, DiagnosticSeverity::Warning);
        assert!(mark.message.contains("'K:H'"));
        assert!(mark.fix.is_none());
    }
}
