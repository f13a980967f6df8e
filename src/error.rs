//! Error types shared by the operations and the HTTP handlers.

use axum::http::StatusCode;
use thiserror::Error;

/// Failure of a file operation against the remote store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    /// Missing or empty required input. Never reaches the remote store.
    #[error("{0}")]
    Validation(String),

    /// The remote store answered 404
    #[error("GitHub API error: {0}")]
    NotFound(String),

    /// Any other remote failure: auth, rate limit, conflict, network
    #[error("GitHub API error: {message}")]
    Upstream { status: Option<u16>, message: String },

    /// Missing credential or repository configuration
    #[error("{0}")]
    Config(String),
}

impl FileError {
    pub fn missing(fields: &[&str]) -> Self {
        FileError::Validation(format!("Missing required fields: {}", fields.join(", ")))
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        FileError::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Upstream failure with no remote status (network, undecodable body)
    pub fn transport(message: impl Into<String>) -> Self {
        FileError::Upstream {
            status: None,
            message: message.into(),
        }
    }

    /// HTTP status mirroring the underlying cause
    pub fn status_code(&self) -> StatusCode {
        match self {
            FileError::Validation(_) => StatusCode::BAD_REQUEST,
            FileError::NotFound(_) => StatusCode::NOT_FOUND,
            FileError::Upstream { status: Some(code), .. } => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            FileError::Upstream { status: None, .. } | FileError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The remote rejected a write because the revision token was stale.
    /// Callers may refetch the sha and retry.
    pub fn is_conflict(&self) -> bool {
        matches!(self, FileError::Upstream { status: Some(409), .. })
    }
}

/// Failure of a page metadata lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    #[error("URL is required")]
    MissingUrl,

    #[error("{0}")]
    Fetch(String),
}

impl MetaError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MetaError::MissingUrl => StatusCode::BAD_REQUEST,
            MetaError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
