// Store error taxonomy

use crate::validation::ValidationError;
use thiserror::Error;

/// Failure returned by a store operation
///
/// Every variant is recoverable: the caller may correct input or retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Todo not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Persistence(String),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, StoreError::Persistence(_))
    }
}

/// Why `get_all` fell back to an empty collection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("failed to read key {key}: {message}")]
    Read { key: String, message: String },

    #[error("corrupt data under key {key}: {message}")]
    Corrupt { key: String, message: String },
}
