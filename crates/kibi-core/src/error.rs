//! Error types for backend operations

use thiserror::Error;

/// Error reported by an index pattern backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// No index matches the requested pattern
    #[error("No indices match pattern: {0}")]
    MissingIndices(String),

    /// The backend refused access to the requested pattern
    #[error("Access to pattern {0} was denied")]
    Authorization(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl BackendError {
    /// Missing indices and access denial are answers, not failures: callers
    /// substitute an empty result for them.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BackendError::MissingIndices(_) | BackendError::Authorization(_)
        )
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::InvalidResponse(err.to_string())
    }
}

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;
