//! Error types for srsgen.
//!
//! Library crates use [`SrsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for every stage of the SRS pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SrsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The selected input is empty or carries an extraction error marker.
    #[error("invalid input: {message}")]
    InputValidation { message: String },

    /// A document or spreadsheet could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The generative service could not be reached or answered with a
    /// non-success status. `body` holds the raw response body when one exists.
    #[error("{}", transport_message(.status, .body))]
    Transport { status: Option<u16>, body: String },

    /// The service answered 200 but the body did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    ResponseShape(String),

    /// The document-rendering engine failed.
    #[error("rendering error: {0}")]
    Rendering(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SrsError>;

fn transport_message(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) => format!("API error (HTTP {code}): {body}"),
        None => format!("API request failed: {body}"),
    }
}

impl SrsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an input validation error from any displayable message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InputValidation {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
