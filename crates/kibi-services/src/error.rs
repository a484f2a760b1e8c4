use kibi_core::BackendError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level errors with user-friendly messages
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Backend request failed: {0}")]
    Backend(#[from] BackendError),

    #[error("Unknown time field: {0}")]
    UnknownTimeField(String),

    #[error("Index pattern cannot be created: {}", .0.join("; "))]
    CreationBlocked(Vec<String>),
}
