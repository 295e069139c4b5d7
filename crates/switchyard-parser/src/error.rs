//! Diagnostics reported while reading a diagram description.
//!
//! Every phase (lexing, parsing, validation) reports problems as
//! [`Diagnostic`]s: a severity, an optional [`ErrorCode`], labelled source
//! spans and help text. A failed phase returns all of its diagnostics
//! wrapped in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use switchyard_parser::error::{Diagnostic, ErrorCode};
//! # use switchyard_parser::Span;
//! let diag = Diagnostic::error("unknown diagram element `zigzag`")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(1..9), "not a diagram element")
//!     .with_help("expected one of `line`, `stack`, `loop`, `or`, `opt`");
//!
//! assert_eq!(diag.to_string(), "error[E200]: unknown diagram element `zigzag`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
