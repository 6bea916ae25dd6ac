//! Error types with actionable diagnostics.
//!
//! Routine domain outcomes (a rejected rebloom, a bloom without enough
//! history) are not errors of this type: they are reported through
//! `bool` returns, neutral defaults or [`InsufficientData`](crate::InsufficientData).
//! This enum covers configuration, IO and persistence failures only.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ValidationError;
use crate::storage::StorageError;

/// Result type alias for entropia operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, persisting or restoring an engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found at expected path.
    #[error("Configuration file not found: {path}\n  → Create a config file or pass --config with a different path")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file has invalid YAML syntax.
    #[error("Invalid configuration syntax in {path}:\n  {message}\n  → Check YAML syntax at the indicated line")]
    ConfigParsing { path: PathBuf, message: String },

    /// Configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// Snapshot persistence failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Check if this error is user-recoverable.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigParsing { .. } | Self::Validation(_)
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "E001",
            Self::ConfigParsing { .. } => "E002",
            Self::Validation(_) => "E003",
            Self::Storage(_) => "E040",
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization { message: e.to_string() }
    }
}
