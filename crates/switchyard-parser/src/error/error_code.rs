//! Error codes, grouped by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Validation errors

use std::fmt;

/// Stable identifiers for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// A string was opened with a quote but never closed on the same line.
    E001,

    /// A character that starts no token.
    E002,

    /// An unrecognized escape sequence in a string literal.
    ///
    /// Valid escapes are: `\n`, `\r`, `\t`, `\\`, `\'`, `\"`, `\0`, `\u{...}`.
    E003,

    /// A malformed `\u{XXXX}` escape.
    E004,

    /// A unicode escape naming a surrogate or out-of-range codepoint.
    E005,

    /// A unicode escape `\u{}` with no hexadecimal digits.
    E006,

    /// An integer literal that does not fit in 64 bits.
    E007,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// The parser encountered a token it did not expect at this position.
    E100,

    /// Input continues after a complete description, or ends before one.
    E101,

    // =========================================================================
    // Validation Errors (E2xx)
    // =========================================================================
    /// A list whose tag names no diagram element.
    E200,

    /// A diagram element with the wrong number of arguments.
    E201,

    /// An `indentstack` width that is not a non-negative integer.
    E202,

    /// An integer where a diagram element was expected.
    E203,

    /// The same text is hyperlinked twice.
    E204,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E007 => "E007",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "invalid unicode escape",
            ErrorCode::E005 => "invalid unicode codepoint",
            ErrorCode::E006 => "empty unicode escape",
            ErrorCode::E007 => "integer out of range",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected input",
            ErrorCode::E200 => "unknown diagram element",
            ErrorCode::E201 => "wrong number of arguments",
            ErrorCode::E202 => "invalid indentation",
            ErrorCode::E203 => "integer is not a diagram element",
            ErrorCode::E204 => "duplicate hyperlink",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
