//! Error types for fcsettings.
//!
//! The parsing, derivation, and comparison stages are total and never fail.
//! Errors only arise at the edges: loading configuration, reading dump files,
//! validating a settings upload, and parsing part selections from the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for fcsettings operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// A dump or backup file could not be read.
    #[error("failed to read {path}: {source}")]
    DumpRead {
        /// Path of the file that couldn't be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Only one half of the GUI backup / CLI dump pair was supplied.
    #[error("please submit both the GUI backup and CLI dump")]
    IncompleteUpload,

    /// A part selection was not of the form `category=part`.
    #[error("invalid part selection '{input}': expected CATEGORY=PART")]
    InvalidPartSelection {
        /// The offending input.
        input: String,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for fcsettings operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid part selection error.
    #[must_use]
    pub fn invalid_part_selection(input: impl Into<String>) -> Self {
        Self::InvalidPartSelection {
            input: input.into(),
        }
    }

    /// Check if this error is the paired-upload validation failure.
    #[must_use]
    pub fn is_incomplete_upload(&self) -> bool {
        matches!(self, Self::IncompleteUpload)
    }

    /// Check if this error came from configuration loading or validation.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad(_) | Self::ConfigValidation { .. })
    }
}
