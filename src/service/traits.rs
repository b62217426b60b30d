//! Storage collaborators
//!
//! Narrow interfaces the circulation service depends on. Implementations
//! decide where books, borrowers, and loans actually live; failures come
//! back as `StorageError` regardless of backend.

use uuid::Uuid;

use crate::aggregate::Loan;
use crate::error::StorageError;

/// Profile data for a registered borrower
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowerProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl BorrowerProfile {
    pub fn new(id: Uuid, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Read access to the book catalog
pub trait BookCatalog {
    /// Whether a book with this id exists in the catalog
    fn book_exists(&self, book_id: Uuid) -> Result<bool, StorageError>;
}

/// Read access to registered borrowers
pub trait BorrowerDirectory {
    /// Look up a borrower's profile
    fn find_borrower(&self, borrower_id: Uuid) -> Result<Option<BorrowerProfile>, StorageError>;
}

/// Persistence for loan aggregates
pub trait LoanStore {
    /// Look up a loan by id
    fn find_loan(&self, loan_id: Uuid) -> Result<Option<Loan>, StorageError>;

    /// The active loan currently holding this book, if any
    fn find_active_loan_for_book(&self, book_id: Uuid) -> Result<Option<Loan>, StorageError>;

    /// Store a freshly created loan
    fn insert(&self, loan: &Loan) -> Result<(), StorageError>;

    /// Persist the current state of an existing loan
    fn update(&self, loan: &Loan) -> Result<(), StorageError>;
}
