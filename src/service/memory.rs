//! In-memory collaborators
//!
//! Map-backed implementations of the storage traits, for tests and for
//! embedding the service without a database. Internally synchronized so a
//! clone can be shared as a fixture while the service holds the original.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

use crate::aggregate::Loan;
use crate::error::StorageError;

use super::traits::{BookCatalog, BorrowerDirectory, BorrowerProfile, LoanStore};

fn lock_err<T>(e: PoisonError<T>) -> StorageError {
    StorageError::new(format!("Lock poisoned: {e}"))
}

/// In-memory book catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookCatalog {
    books: Arc<RwLock<HashSet<Uuid>>>,
}

impl InMemoryBookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a book in the catalog
    pub fn add_book(&self, book_id: Uuid) {
        if let Ok(mut books) = self.books.write() {
            books.insert(book_id);
        }
    }
}

impl BookCatalog for InMemoryBookCatalog {
    fn book_exists(&self, book_id: Uuid) -> Result<bool, StorageError> {
        Ok(self.books.read().map_err(lock_err)?.contains(&book_id))
    }
}

/// In-memory borrower directory
#[derive(Debug, Clone, Default)]
pub struct InMemoryBorrowerDirectory {
    borrowers: Arc<RwLock<HashMap<Uuid, BorrowerProfile>>>,
}

impl InMemoryBorrowerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a borrower
    pub fn add_borrower(&self, profile: BorrowerProfile) {
        if let Ok(mut borrowers) = self.borrowers.write() {
            borrowers.insert(profile.id, profile);
        }
    }
}

impl BorrowerDirectory for InMemoryBorrowerDirectory {
    fn find_borrower(&self, borrower_id: Uuid) -> Result<Option<BorrowerProfile>, StorageError> {
        Ok(self
            .borrowers
            .read()
            .map_err(lock_err)?
            .get(&borrower_id)
            .cloned())
    }
}

/// In-memory loan store
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoanStore {
    loans: Arc<RwLock<HashMap<Uuid, Loan>>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of loans held
    pub fn len(&self) -> usize {
        self.loans.read().map(|loans| loans.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LoanStore for InMemoryLoanStore {
    fn find_loan(&self, loan_id: Uuid) -> Result<Option<Loan>, StorageError> {
        Ok(self.loans.read().map_err(lock_err)?.get(&loan_id).cloned())
    }

    fn find_active_loan_for_book(&self, book_id: Uuid) -> Result<Option<Loan>, StorageError> {
        Ok(self
            .loans
            .read()
            .map_err(lock_err)?
            .values()
            .find(|loan| loan.book_id() == book_id && loan.is_active())
            .cloned())
    }

    fn insert(&self, loan: &Loan) -> Result<(), StorageError> {
        let mut loans = self.loans.write().map_err(lock_err)?;
        if loans.contains_key(&loan.id()) {
            return Err(StorageError::new(format!("Duplicate loan id: {}", loan.id())));
        }
        loans.insert(loan.id(), loan.clone());
        Ok(())
    }

    fn update(&self, loan: &Loan) -> Result<(), StorageError> {
        let mut loans = self.loans.write().map_err(lock_err)?;
        if !loans.contains_key(&loan.id()) {
            return Err(StorageError::new(format!("Unknown loan id: {}", loan.id())));
        }
        loans.insert(loan.id(), loan.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_loan() -> Loan {
        let (loan, _) = Loan::create(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Ada Lovelace".to_string(),
            "ada@example.com".to_string(),
            14,
            Utc::now(),
        )
        .unwrap();
        loan
    }

    #[test]
    fn test_book_catalog() {
        let catalog = InMemoryBookCatalog::new();
        let book_id = Uuid::new_v4();

        assert!(!catalog.book_exists(book_id).unwrap());
        catalog.add_book(book_id);
        assert!(catalog.book_exists(book_id).unwrap());
    }

    #[test]
    fn test_borrower_directory() {
        let directory = InMemoryBorrowerDirectory::new();
        let id = Uuid::new_v4();

        assert_eq!(directory.find_borrower(id).unwrap(), None);

        directory.add_borrower(BorrowerProfile::new(id, "Ada", "ada@example.com"));
        let profile = directory.find_borrower(id).unwrap().unwrap();
        assert_eq!(profile.name, "Ada");
    }

    #[test]
    fn test_loan_store_insert_and_update() {
        let store = InMemoryLoanStore::new();
        let mut loan = sample_loan();

        assert!(store.find_loan(loan.id()).unwrap().is_none());

        store.insert(&loan).unwrap();
        assert!(store.insert(&loan).is_err());
        assert_eq!(store.len(), 1);

        loan.return_book(Utc::now()).unwrap();
        store.update(&loan).unwrap();
        assert!(store.find_loan(loan.id()).unwrap().unwrap().is_completed());

        let unsaved = sample_loan();
        assert!(store.update(&unsaved).is_err());
    }

    #[test]
    fn test_active_loan_lookup_ignores_finished_loans() {
        let store = InMemoryLoanStore::new();
        let mut loan = sample_loan();
        let book_id = loan.book_id();

        store.insert(&loan).unwrap();
        assert!(store.find_active_loan_for_book(book_id).unwrap().is_some());

        loan.return_book(Utc::now()).unwrap();
        store.update(&loan).unwrap();
        assert!(store.find_active_loan_for_book(book_id).unwrap().is_none());
    }
}
