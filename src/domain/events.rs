//! Domain Events
//!
//! Events emitted by the loan lifecycle. Events are immutable facts and
//! are only produced after the originating operation has passed validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a fine raised against a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FineType {
    /// Book returned after the due date
    LateFee,

    /// Book returned with reported damage
    DamageFee,

    /// Book reported lost
    LostBookFee,
}

impl std::fmt::Display for FineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FineType::LateFee => write!(f, "late fee"),
            FineType::DamageFee => write!(f, "damage fee"),
            FineType::LostBookFee => write!(f, "lost book fee"),
        }
    }
}

/// Loan-related events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LoanEvent {
    /// A book was checked out
    LoanCreated {
        loan_id: Uuid,
        book_id: Uuid,
        borrower_id: Uuid,
        loan_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    },

    /// The due date was pushed back
    DueDateExtended {
        loan_id: Uuid,
        additional_days: i64,
        new_due_date: DateTime<Utc>,
        extended_at: DateTime<Utc>,
    },

    /// The book came back (possibly late)
    LoanReturned {
        loan_id: Uuid,
        return_date: DateTime<Utc>,
        days_late: i64,
    },

    /// The book was reported lost
    LoanMarkedLost {
        loan_id: Uuid,
        lost_at: DateTime<Utc>,
    },

    /// The loan finished with nothing outstanding
    LoanCompleted {
        loan_id: Uuid,
        completed_at: DateTime<Utc>,
    },

    /// A fine was raised against the loan
    FineIssued {
        loan_id: Uuid,
        fine_id: Uuid,
        fine_type: FineType,
        amount: Decimal,
        currency: String,
        reason: String,
        issued_at: DateTime<Utc>,
    },

    /// A fine was settled by payment
    FinePaid {
        loan_id: Uuid,
        fine_id: Uuid,
        payment_reference: String,
        paid_at: DateTime<Utc>,
    },

    /// A fine was forgiven
    FineWaived {
        loan_id: Uuid,
        fine_id: Uuid,
        reason: String,
        waived_at: DateTime<Utc>,
    },
}

impl LoanEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            LoanEvent::LoanCreated { .. } => "LoanCreated",
            LoanEvent::DueDateExtended { .. } => "DueDateExtended",
            LoanEvent::LoanReturned { .. } => "LoanReturned",
            LoanEvent::LoanMarkedLost { .. } => "LoanMarkedLost",
            LoanEvent::LoanCompleted { .. } => "LoanCompleted",
            LoanEvent::FineIssued { .. } => "FineIssued",
            LoanEvent::FinePaid { .. } => "FinePaid",
            LoanEvent::FineWaived { .. } => "FineWaived",
        }
    }

    /// Get the loan ID this event relates to
    pub fn loan_id(&self) -> Uuid {
        match self {
            LoanEvent::LoanCreated { loan_id, .. } => *loan_id,
            LoanEvent::DueDateExtended { loan_id, .. } => *loan_id,
            LoanEvent::LoanReturned { loan_id, .. } => *loan_id,
            LoanEvent::LoanMarkedLost { loan_id, .. } => *loan_id,
            LoanEvent::LoanCompleted { loan_id, .. } => *loan_id,
            LoanEvent::FineIssued { loan_id, .. } => *loan_id,
            LoanEvent::FinePaid { loan_id, .. } => *loan_id,
            LoanEvent::FineWaived { loan_id, .. } => *loan_id,
        }
    }
}
