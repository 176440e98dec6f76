use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

/// Failures reading, writing or validating the panel's own settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Settings Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Settings Write Error: {path}: {source} {location}")]
    WriteError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings Directory Not Found Error: {location}")]
    DirectoryNotFound { location: ErrorLocation },

    #[error("Settings Serialization Error: {reason} {location}")]
    SerializeError {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Settings Validation Error: {reason} {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },
}
