//! Error contract shared by networked collaborators.

use std::sync::Arc;
use thiserror::Error;

/// Result type for issue-tracker and code-review operations.
pub type RemoteServiceResult<T> = Result<T, RemoteServiceError>;

/// Errors returned by networked collaborator adapters.
#[derive(Debug, Clone, Error)]
pub enum RemoteServiceError {
    /// The addressed remote resource does not exist.
    #[error("remote resource not found: {0}")]
    NotFound(String),

    /// The service rejected the configured credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The service refused the request as invalid or conflicting.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Network or protocol failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteServiceError {
    /// Wraps a network or protocol error.
    #[must_use]
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
