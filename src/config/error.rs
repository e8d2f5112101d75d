//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::rsa::RsaError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Worker count parsed but is zero.
    #[error("invalid worker count '{value}': must be at least 1")]
    InvalidWorkers { value: String },

    /// Worker count string could not be parsed as a number.
    #[error("failed to parse worker count '{value}': {source}")]
    WorkersParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Reranking hyperparameters were rejected.
    #[error(transparent)]
    Rsa(#[from] RsaError),

    /// Model settings were rejected.
    #[error("invalid model configuration: {reason}")]
    Model { reason: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
