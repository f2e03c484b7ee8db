//! Diagnostics module for editor error detection
//!
//! Positioned errors and warnings handed to the editor's lint layer. Broken
//! elements are the first customer; measure fill checks and replaced header
//! values use the same marks.

pub mod elements;
pub mod measures;

pub use elements::{report_embedded_fragment, report_error_marker, report_invalid_metadata};
pub use measures::{classify_measure, report_measure};

use serde::{Deserialize, Serialize};

use crate::text::cursor::TextRange;

/// Severity level for diagnostic marks
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl DiagnosticSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        }
    }
}

/// Quick fix offered alongside a diagnostic
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum DiagnosticFix {
    /// Remove the offending text
    DeleteSpan { from: usize, to: usize },
}

/// A diagnostic highlighting an issue at a byte range
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub from: usize,
    pub to: usize,
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Element the problem was found in ("Note", "Measure", "ABC", ...)
    pub source: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<DiagnosticFix>,
}

impl Diagnostic {
    pub fn new(
        range: TextRange,
        severity: DiagnosticSeverity,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            from: range.from,
            to: range.to,
            severity,
            source: source.into(),
            message: message.into(),
            fix: None,
        }
    }

    /// Offer deleting the highlighted span
    pub fn with_delete_fix(mut self) -> Self {
        self.fix = Some(DiagnosticFix::DeleteSpan {
            from: self.from,
            to: self.to,
        });
        self
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.from, self.to)
    }
}

/// Collection of diagnostics for an entire document
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    /// All diagnostics in the order they were found
    pub marks: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create empty diagnostics
    pub fn new() -> Self {
        Self { marks: Vec::new() }
    }

    /// Add a mark; zero-width marks are dropped
    pub fn add(&mut self, mark: Diagnostic) {
        if mark.from == mark.to {
            return;
        }
        self.marks.push(mark);
    }

    /// Extend with multiple marks
    pub fn extend(&mut self, marks: impl IntoIterator<Item = Diagnostic>) {
        for mark in marks {
            self.add(mark);
        }
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.marks
            .iter()
            .any(|m| m.severity == DiagnosticSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.marks
            .iter()
            .filter(|m| m.severity == DiagnosticSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.marks
            .iter()
            .filter(|m| m.severity == DiagnosticSeverity::Warning)
    }

    /// Check if there are any diagnostics
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let mark = Diagnostic::new(
            TextRange::new(5, 7),
            DiagnosticSeverity::Error,
            "Note",
            "Test error message",
        );

        assert_eq!(mark.from, 5);
        assert_eq!(mark.to, 7);
        assert_eq!(mark.severity, DiagnosticSeverity::Error);
        assert_eq!(mark.source, "Note");
        assert!(mark.fix.is_none());
        assert_eq!(
            mark.with_delete_fix().fix,
            Some(DiagnosticFix::DeleteSpan { from: 5, to: 7 })
        );
    }

    #[test]
    fn test_diagnostics_has_errors() {
        let mut diags = Diagnostics::new();
        assert!(!diags.has_errors());

        diags.add(Diagnostic::new(
            TextRange::new(0, 1),
            DiagnosticSeverity::Warning,
            "Measure",
            "Warning",
        ));
        assert!(!diags.has_errors());

        diags.add(Diagnostic::new(
            TextRange::new(1, 2),
            DiagnosticSeverity::Error,
            "ABC",
            "Error",
        ));
        assert!(diags.has_errors());
        assert_eq!(diags.errors().count(), 1);
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn test_zero_width_marks_are_ignored() {
        let mut diags = Diagnostics::new();
        diags.add(Diagnostic::new(
            TextRange::at(4),
            DiagnosticSeverity::Error,
            "Chord",
            "empty",
        ));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_lint_shape() {
        let mark = Diagnostic::new(
            TextRange::new(2, 3),
            DiagnosticSeverity::Warning,
            "Measure",
            "Measure 1 is underfilled",
        );
        let json = serde_json::to_value(&mark).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["from"], 2);
        assert!(json.get("fix").is_none());

        let json = serde_json::to_value(mark.with_delete_fix()).unwrap();
        assert_eq!(json["fix"]["action"], "deleteSpan");
    }
}
