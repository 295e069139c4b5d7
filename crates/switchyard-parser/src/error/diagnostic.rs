//! The core diagnostic type.

use std::fmt;

use crate::{
    error::{ErrorCode, Label, Severity},
    span::Span,
};

/// A single error or warning with source locations.
///
/// Rendered by a terminal reporter it looks like:
///
/// ```text
/// error[E200]: unknown diagram element `lop`
///  --> grammar.syn:1:2
///   |
/// 1 | ['lop', 'item', ',']
///   |  ^^^^^ not a diagram element
///   |
///   = help: did you mean `loop`?
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// ```
    /// # use switchyard_parser::error::{Diagnostic, ErrorCode};
    /// # use switchyard_parser::Span;
    /// let diag = Diagnostic::error("unterminated string literal")
    ///     .with_code(ErrorCode::E001)
    ///     .with_label(Span::new(0..4), "string starts here")
    ///     .with_help("close the string with the quote it was opened with");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_diagnostic_is_bare() {
        let diag = Diagnostic::warning("duplicate hyperlink for `expr`");
        assert!(diag.severity().is_warning());
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert!(diag.primary_span().is_none());
    }

    #[test]
    fn test_builder_chain() {
        let diag = Diagnostic::error("duplicate hyperlink")
            .with_code(ErrorCode::E204)
            .with_secondary_label(Span::new(2..8), "first defined here")
            .with_label(Span::new(20..26), "redefined here")
            .with_help("remove one of the entries");

        assert_eq!(diag.code(), Some(ErrorCode::E204));
        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.primary_span(), Some(Span::new(20..26)));
        assert_eq!(diag.help(), Some("remove one of the entries"));
    }

    #[test]
    fn test_display() {
        let with_code = Diagnostic::error("unexpected token").with_code(ErrorCode::E100);
        assert_eq!(with_code.to_string(), "error[E100]: unexpected token");

        let without = Diagnostic::warning("something odd");
        assert_eq!(without.to_string(), "warning: something odd");
    }
}
