//! Fine Entity
//!
//! A fine owed against a loan. Fines are created and resolved only through
//! the owning Loan aggregate, never on their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, FineType, Money};

/// Fine status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FineStatus {
    Pending,
    Paid,
    Waived,
}

impl Default for FineStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for FineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FineStatus::Pending => write!(f, "pending"),
            FineStatus::Paid => write!(f, "paid"),
            FineStatus::Waived => write!(f, "waived"),
        }
    }
}

/// Fine
///
/// An amount a borrower owes for a late return, damage, or a lost book.
/// Once paid or waived a fine never changes again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fine {
    /// Unique fine ID
    id: Uuid,

    /// What the fine was raised for
    fine_type: FineType,

    /// Amount owed
    amount: Money,

    /// Human-readable reason; waiving appends the waive note
    reason: String,

    /// When the fine was raised
    issued_date: DateTime<Utc>,

    /// When the fine was paid (only for paid fines)
    paid_date: Option<DateTime<Utc>>,

    /// Fine status
    status: FineStatus,

    /// External payment reference (only for paid fines)
    payment_reference: Option<String>,
}

impl Fine {
    /// Raise a new fine. Only the Loan aggregate calls this.
    pub(crate) fn new(
        fine_type: FineType,
        amount: Money,
        reason: String,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if reason.trim().is_empty() {
            return Err(DomainError::empty("Fine reason"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            fine_type,
            amount,
            reason,
            issued_date: now,
            paid_date: None,
            status: FineStatus::Pending,
            payment_reference: None,
        })
    }

    /// Settle the fine with a payment.
    pub(crate) fn pay(
        &mut self,
        payment_reference: String,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.status != FineStatus::Pending {
            return Err(DomainError::FineAlreadySettled {
                status: self.status.to_string(),
            });
        }

        if payment_reference.trim().is_empty() {
            return Err(DomainError::empty("Payment reference"));
        }

        self.paid_date = Some(now);
        self.payment_reference = Some(payment_reference);
        self.status = FineStatus::Paid;
        Ok(())
    }

    /// Forgive the fine, recording why.
    pub(crate) fn waive(&mut self, reason: String) -> Result<(), DomainError> {
        if self.status != FineStatus::Pending {
            return Err(DomainError::FineAlreadySettled {
                status: self.status.to_string(),
            });
        }

        if reason.trim().is_empty() {
            return Err(DomainError::empty("Waive reason"));
        }

        self.reason = format!("{} - WAIVED: {}", self.reason, reason);
        self.status = FineStatus::Waived;
        Ok(())
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn fine_type(&self) -> FineType {
        self.fine_type
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn issued_date(&self) -> DateTime<Utc> {
        self.issued_date
    }

    pub fn paid_date(&self) -> Option<DateTime<Utc>> {
        self.paid_date
    }

    pub fn status(&self) -> &FineStatus {
        &self.status
    }

    pub fn payment_reference(&self) -> Option<&str> {
        self.payment_reference.as_deref()
    }

    pub fn is_paid(&self) -> bool {
        self.status == FineStatus::Paid
    }

    pub fn is_pending(&self) -> bool {
        self.status == FineStatus::Pending
    }

    /// Whole days this fine has been open. Zero once settled.
    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        if self.status == FineStatus::Pending {
            (now - self.issued_date).num_days()
        } else {
            0
        }
    }
}
