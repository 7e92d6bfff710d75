//! Error types for mastery-core.
//!
//! Content problems found while compiling lesson markdown are *not* errors in
//! this sense: they travel as diagnostics inside an import result. The
//! variants here cover caller mistakes and failures at the boundaries
//! (unknown ids, unreadable configuration, malformed JSON input).

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for Mastery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the Mastery crates.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error tied to a specific path.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Input could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity (e.g. "unit", "node").
        kind: String,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// Configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value violates a business rule.
    #[error("Validation error on {field}: {message}")]
    Validation {
        /// Field that failed validation.
        field: String,
        /// What went wrong.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    /// Creates a not-found error for an entity kind and id.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Creates a validation error for a field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path that caused it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
