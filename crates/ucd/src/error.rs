//! Error types for ucd operations.
//!
//! This module provides the main error type [`UcdError`] which wraps the
//! error conditions that can occur while processing a diagram.

use std::io;

use thiserror::Error;

use ucd_parser::error::ParseError;

/// The main error type for ucd operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the parse error so that
/// callers can render the diagnostic with a source excerpt.
#[derive(Debug, Error)]
pub enum UcdError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),
}

impl UcdError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
