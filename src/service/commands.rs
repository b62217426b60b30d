//! Command definitions
//!
//! Commands represent requests to change the lending state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::LoanEvent;

/// Command to check a book out to a borrower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutBookCommand {
    /// Book to lend
    pub book_id: Uuid,

    /// Borrower the loan is for; defaults to the acting user
    pub borrower_id: Option<Uuid>,

    /// Loan duration in days; defaults to the standard duration
    pub duration_days: Option<i64>,
}

impl CheckOutBookCommand {
    pub fn new(book_id: Uuid) -> Self {
        Self {
            book_id,
            borrower_id: None,
            duration_days: None,
        }
    }

    pub fn with_borrower(mut self, borrower_id: Uuid) -> Self {
        self.borrower_id = Some(borrower_id);
        self
    }

    pub fn with_duration(mut self, duration_days: i64) -> Self {
        self.duration_days = Some(duration_days);
        self
    }
}

/// Result of a successful checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutResult {
    pub loan_id: Uuid,
    pub book_id: Uuid,
    pub borrower_id: Uuid,
    pub due_date: DateTime<Utc>,
    pub events: Vec<LoanEvent>,
}
