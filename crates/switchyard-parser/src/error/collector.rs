//! Accumulates diagnostics so a phase can report every problem at once.

use log::warn;

use crate::error::{Diagnostic, ParseError};

/// Collects the diagnostics emitted by one processing phase.
///
/// Warnings do not fail the phase. They are logged when emitted, since a
/// successful [`finish`](Self::finish) has nowhere to return them.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        } else {
            warn!(diagnostic:%; "Diagram description warning");
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `Err` with every collected diagnostic if any of them is an
    /// error.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_empty_collector_is_ok() {
        assert!(DiagnosticCollector::new().finish().is_ok());
    }

    #[test]
    fn test_warnings_alone_are_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("duplicate hyperlink"));
        collector.emit(Diagnostic::warning("another one"));
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_errors_keep_all_diagnostics_in_order() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::error("unknown diagram element `zig`")
                .with_code(ErrorCode::E200)
                .with_label(Span::new(1..6), "here"),
        );
        collector.emit(Diagnostic::warning("duplicate hyperlink"));
        collector.emit(Diagnostic::error("second"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
        assert_eq!(err.diagnostics()[0].message(), "unknown diagram element `zig`");
        assert!(err.diagnostics()[1].severity().is_warning());
    }
}
