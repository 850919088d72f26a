//! Error types for reading and writing the config file.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving the config document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No config file exists yet.
    #[error("Config file not found at {}; run setup first", .0.display())]
    NotFound(PathBuf),

    /// The home directory could not be determined.
    #[error("Could not determine the home directory for the config file")]
    NoHomeDir,

    /// Filesystem read or write failed.
    #[error("Config I/O error: {0}")]
    Io(String),

    /// The file is not valid JSON or does not match either known shape.
    #[error("Malformed config: {0}")]
    Parse(String),

    /// A legacy single-profile document lacks key material.
    #[error("Config missing profile data; run setup again")]
    IncompleteLegacy,

    /// Serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
