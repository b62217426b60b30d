//! Error handling module
//!
//! Centralized error types for the service layer.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::DomainError;

/// Service-wide Result type
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure reported by a storage collaborator.
///
/// Implementations fold whatever their backend raises into this one type;
/// the service treats every storage failure the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Storage failure: {0}")]
pub struct StorageError(String);

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Service error types
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    #[error("Book is already on loan: {0}")]
    BookAlreadyOnLoan(Uuid),

    #[error("Loan not found: {0}")]
    LoanNotFound(Uuid),

    #[error("Borrower not found: {0}")]
    BorrowerNotFound(Uuid),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Storage errors
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// Check if this error means a referenced entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BookNotFound(_) | Self::LoanNotFound(_) | Self::BorrowerNotFound(_)
        )
    }
}
