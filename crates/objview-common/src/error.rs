//! Error types for objview
//!
//! This module defines the common error type shared by the builder and the
//! configuration loader.

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for objview operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for objview
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Builder input errors
    #[error("cannot provide both a dataset mapping and a mapping file")]
    ConflictingSources,

    #[error("{} does not exist", .0.display())]
    SourceSpecNotFound(PathBuf),

    #[error("invalid dataset mapping in {}: {reason}", .path.display())]
    InvalidSourceSpec { path: PathBuf, reason: String },

    // Manifest errors
    #[error("manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("manifest is invalid: {0}")]
    ManifestInvalid(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Check if this error stems from bad caller input rather than the system
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConflictingSources
                | Self::SourceSpecNotFound(_)
                | Self::InvalidSourceSpec { .. }
                | Self::Configuration(_)
        )
    }
}
