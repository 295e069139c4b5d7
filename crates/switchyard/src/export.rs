//! Export of laid out diagrams.
//!
//! This is the last stage of the pipeline:
//!
//! ```text
//! Source Text
//!     ↓ parse
//! Literal + hyperlinks
//!     ↓ convert
//! DiagramSpec
//!     ↓ layout
//! Canvas of positioned shapes
//!     ↓ export (this module)
//! Output document
//! ```
//!
//! Export operations return [`Error`], which converts into
//! [`SwitchyardError::Export`] at the crate boundary.
//!
//! [`SwitchyardError::Export`]: crate::SwitchyardError::Export

/// SVG export backend.
pub mod svg;

use switchyard_core::draw::Canvas;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Writes every shape of `canvas` in the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the canvas cannot be converted, or
    /// [`Error::Io`] if writing the output fails.
    fn export_canvas(&mut self, canvas: &Canvas) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or configuration failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
