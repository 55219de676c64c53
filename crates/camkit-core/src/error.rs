//! Error handling for CamKit
//!
//! Errors shared by every crate in the workspace. Editing errors that are
//! reported to the user live next to the editor itself.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Unsupported configuration file format
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension that was rejected.
        extension: String,
    },

    /// A configuration value failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The background task queue has been shut down
    #[error("Task queue closed while submitting {task}")]
    TaskQueueClosed {
        /// Name of the task that could not be submitted.
        task: String,
    },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
