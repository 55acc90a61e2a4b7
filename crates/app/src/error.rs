//! Application error types.

use domain::DomainError;
use repository::RepositoryError;
use thiserror::Error;

/// Errors returned by the equipment use cases.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request itself is unusable.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Domain error.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The unit of work committed but its events could not be delivered.
    #[error("Event sink error: {0}")]
    EventSink(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Returns true if the requested aggregate does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            AppError::Domain(err) => err.is_not_found(),
            AppError::Repository(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Returns true if the request lost a race and may be retried.
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Repository(err) if err.is_conflict())
    }

    /// Returns true if the request should not be retried unchanged.
    pub fn is_validation(&self) -> bool {
        match self {
            AppError::Validation(_) => true,
            AppError::Domain(err) => err.is_validation(),
            _ => false,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
