/// Error type returned by the data access services and the board controller
///
/// Validation failures are raised before the store is touched. Store errors
/// are passed through unchanged; nothing here retries or swallows them.

use crate::validation::ValidationError;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected before any query was issued
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database or transport failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    /// Returns the validation failure, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ServiceError::Validation(err) => Some(err),
            ServiceError::Database(_) => None,
        }
    }
}
