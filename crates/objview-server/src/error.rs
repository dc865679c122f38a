//! Server error types and responses
//!
//! Every variant renders as a plain-text body with its status code.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("File path is required.")]
    MissingPath,

    #[error("File not found.")]
    FileNotFound,

    /// Manifest missing when fetched through the JSON endpoint
    #[error("{0} not found on server.")]
    ManifestNotFound(String),

    /// Manifest missing when downloaded as a raw file
    #[error("{0} not found on server.")]
    ManifestFileNotFound(String),

    #[error("{0} is invalid.")]
    ManifestInvalid(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Get the HTTP status code
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingPath => StatusCode::BAD_REQUEST,
            Self::FileNotFound | Self::ManifestFileNotFound(_) => StatusCode::NOT_FOUND,
            Self::ManifestNotFound(_) | Self::ManifestInvalid(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
