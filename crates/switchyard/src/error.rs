//! Error types for Switchyard operations.
//!
//! This module provides the main error type [`SwitchyardError`] which wraps
//! the failures of every stage of diagram processing.

use std::io;

use thiserror::Error;

use switchyard_parser::error::ParseError;

use crate::{config::ConfigError, layout::LayoutError};

/// The main error type for Switchyard operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the structured
/// diagnostics so callers can render labelled spans.
#[derive(Debug, Error)]
pub enum SwitchyardError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for SwitchyardError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl SwitchyardError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
