//! Loan Aggregate
//!
//! Loan is the aggregate root for the lending lifecycle. It owns the fines
//! raised against it and is the only place their state can change. Every
//! mutating operation validates first, then applies, and returns the domain
//! events it produced.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{DomainError, FineType, LoanEvent, Money};

use super::fine::Fine;

/// Loan duration applied when a checkout does not name one
pub const DEFAULT_LOAN_DURATION_DAYS: i64 = 14;

/// Longest duration a loan can be created with
pub const MAX_INITIAL_LOAN_DAYS: i64 = 30;

/// Longest total duration a loan can reach through extensions
pub const MAX_TOTAL_LOAN_DAYS: i64 = 90;

/// Fee charged per whole day a return is late
const LATE_FEE_PER_DAY: &str = "1.50";

/// Replacement cost charged when a lost book has no explicit cost
const DEFAULT_REPLACEMENT_COST: &str = "20.00";

/// Currency standard fines are issued in
const FINE_CURRENCY: &str = "EUR";

/// Loan status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// Book is out with the borrower
    Active,

    /// Book came back, fines may still be open
    Returned,

    /// Book was reported lost (terminal)
    Lost,

    /// Loan finished with nothing outstanding (terminal)
    Completed,
}

impl Default for LoanStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanStatus::Active => write!(f, "Active"),
            LoanStatus::Returned => write!(f, "Returned"),
            LoanStatus::Lost => write!(f, "Lost"),
            LoanStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Loan Aggregate
///
/// Tracks a single book checkout from creation to completion:
/// Active -> Returned -> Completed, or Active -> Lost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Unique loan ID
    id: Uuid,

    /// Book being lent
    book_id: Uuid,

    /// Borrower the loan is for
    borrower_id: Uuid,

    /// Borrower contact details captured at checkout
    borrower_name: String,
    borrower_email: String,

    /// When the book went out
    loan_date: DateTime<Utc>,

    /// When the book is due back
    due_date: DateTime<Utc>,

    /// When the book came back (never set for lost books)
    return_date: Option<DateTime<Utc>>,

    /// Loan status
    status: LoanStatus,

    /// Fines raised against this loan, in issue order
    fines: Vec<Fine>,
}

impl Loan {
    // =========================================================================
    // Loan::create()
    // =========================================================================

    /// Check a book out to a borrower and generate the creation event.
    ///
    /// # Errors
    /// - `DomainError::NilId` if the book or borrower id is nil
    /// - `DomainError::EmptyField` if the name or email is blank
    /// - `DomainError::InvalidLoanDuration` if the duration is outside 1..=30
    pub fn create(
        book_id: Uuid,
        borrower_id: Uuid,
        borrower_name: String,
        borrower_email: String,
        loan_duration_days: i64,
        now: DateTime<Utc>,
    ) -> Result<(Self, LoanEvent), DomainError> {
        if book_id.is_nil() {
            return Err(DomainError::nil_id("Book id"));
        }
        if borrower_id.is_nil() {
            return Err(DomainError::nil_id("Borrower id"));
        }
        if borrower_name.trim().is_empty() {
            return Err(DomainError::empty("Borrower name"));
        }
        if borrower_email.trim().is_empty() {
            return Err(DomainError::empty("Borrower email"));
        }
        if loan_duration_days <= 0 || loan_duration_days > MAX_INITIAL_LOAN_DAYS {
            return Err(DomainError::InvalidLoanDuration {
                days: loan_duration_days,
                max_days: MAX_INITIAL_LOAN_DAYS,
            });
        }

        let loan_id = Uuid::new_v4();
        let due_date = now + Duration::days(loan_duration_days);

        let event = LoanEvent::LoanCreated {
            loan_id,
            book_id,
            borrower_id,
            loan_date: now,
            due_date,
        };

        let loan = Self {
            id: loan_id,
            book_id,
            borrower_id,
            borrower_name,
            borrower_email,
            loan_date: now,
            due_date,
            return_date: None,
            status: LoanStatus::Active,
            fines: Vec::new(),
        };

        Ok((loan, event))
    }

    // =========================================================================
    // Loan::extend_due_date()
    // =========================================================================

    /// Push the due date back by `additional_days`.
    ///
    /// Only active, non-overdue loans can be extended, and the total
    /// duration from the loan date may never exceed 90 days. Repeated
    /// extensions count against the same cap.
    pub fn extend_due_date(
        &mut self,
        additional_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<LoanEvent>, DomainError> {
        if self.status != LoanStatus::Active {
            return Err(DomainError::invalid_state("extend the due date", &self.status));
        }
        if self.is_overdue(now) {
            return Err(DomainError::OverdueLoan {
                days_overdue: self.days_overdue(now),
            });
        }
        if additional_days <= 0 {
            return Err(DomainError::InvalidExtension(additional_days));
        }

        let current_days = (self.due_date - self.loan_date).num_days();
        let total_days = current_days.saturating_add(additional_days);
        if total_days > MAX_TOTAL_LOAN_DAYS {
            return Err(DomainError::DurationCapExceeded {
                total_days,
                max_days: MAX_TOTAL_LOAN_DAYS,
            });
        }

        self.due_date = self.due_date + Duration::days(additional_days);

        Ok(vec![LoanEvent::DueDateExtended {
            loan_id: self.id,
            additional_days,
            new_due_date: self.due_date,
            extended_at: now,
        }])
    }

    // =========================================================================
    // Loan::return_book()
    // =========================================================================

    /// Take the book back.
    ///
    /// A late return raises a pending late fee of 1.50 per whole day late;
    /// a return with nothing outstanding completes the loan immediately.
    pub fn return_book(&mut self, now: DateTime<Utc>) -> Result<Vec<LoanEvent>, DomainError> {
        if self.status != LoanStatus::Active {
            return Err(DomainError::invalid_state("return the book", &self.status));
        }

        let days_late = (now - self.due_date).num_days().max(0);

        // Build the fine before touching any state.
        let late_fine = if now > self.due_date {
            let per_day = Money::new(
                Decimal::from_str(LATE_FEE_PER_DAY).expect("Invalid LATE_FEE_PER_DAY constant"),
                FINE_CURRENCY,
            )?;
            let amount = per_day.multiply_by(Decimal::from(days_late))?;
            let reason = format!("Late return fee: {} days overdue", days_late);
            Some(Fine::new(FineType::LateFee, amount, reason, now)?)
        } else {
            None
        };

        self.return_date = Some(now);
        self.status = LoanStatus::Returned;

        let mut events = vec![LoanEvent::LoanReturned {
            loan_id: self.id,
            return_date: now,
            days_late,
        }];

        if let Some(fine) = late_fine {
            events.push(self.issue(fine));
        }

        if let Some(event) = self.auto_complete(now) {
            events.push(event);
        }

        Ok(events)
    }

    // =========================================================================
    // Loan::mark_as_lost()
    // =========================================================================

    /// Report the book as lost.
    ///
    /// The loan moves to its terminal Lost state (the return date stays
    /// unset) and a replacement fine is raised: the supplied cost, or the
    /// standard 20.00 when none is given.
    pub fn mark_as_lost(
        &mut self,
        replacement_cost: Option<Money>,
        now: DateTime<Utc>,
    ) -> Result<Vec<LoanEvent>, DomainError> {
        if self.status != LoanStatus::Active {
            return Err(DomainError::invalid_state("mark the book as lost", &self.status));
        }

        let cost = match replacement_cost {
            Some(cost) => cost,
            None => Money::new(
                Decimal::from_str(DEFAULT_REPLACEMENT_COST)
                    .expect("Invalid DEFAULT_REPLACEMENT_COST constant"),
                FINE_CURRENCY,
            )?,
        };
        let fine = Fine::new(
            FineType::LostBookFee,
            cost,
            "Book replacement fee".to_string(),
            now,
        )?;

        self.status = LoanStatus::Lost;

        let mut events = vec![LoanEvent::LoanMarkedLost {
            loan_id: self.id,
            lost_at: now,
        }];
        events.push(self.issue(fine));

        Ok(events)
    }

    // =========================================================================
    // Loan::report_damage()
    // =========================================================================

    /// Raise a damage fine against the loan.
    ///
    /// Allowed while the loan is active or returned. Never changes the loan
    /// status, even when the loan could otherwise complete.
    pub fn report_damage(
        &mut self,
        description: String,
        cost: Money,
        now: DateTime<Utc>,
    ) -> Result<Vec<LoanEvent>, DomainError> {
        if self.status == LoanStatus::Lost || self.status == LoanStatus::Completed {
            return Err(DomainError::invalid_state("report damage", &self.status));
        }
        if description.trim().is_empty() {
            return Err(DomainError::empty("Damage description"));
        }
        if cost.amount() <= Decimal::ZERO {
            return Err(DomainError::NonPositiveCost(cost.amount()));
        }

        let reason = format!("Book damage fee: {}", description.trim());
        let fine = Fine::new(FineType::DamageFee, cost, reason, now)?;

        Ok(vec![self.issue(fine)])
    }

    // =========================================================================
    // Loan::pay_fine() / Loan::waive_fine()
    // =========================================================================

    /// Pay one of this loan's fines.
    ///
    /// Settling the last pending fine on a returned loan completes it.
    pub fn pay_fine(
        &mut self,
        fine_id: Uuid,
        payment_reference: String,
        now: DateTime<Utc>,
    ) -> Result<Vec<LoanEvent>, DomainError> {
        let fine = self
            .fines
            .iter_mut()
            .find(|f| f.id() == fine_id)
            .ok_or(DomainError::FineNotFound(fine_id))?;

        fine.pay(payment_reference.clone(), now)?;

        let mut events = vec![LoanEvent::FinePaid {
            loan_id: self.id,
            fine_id,
            payment_reference,
            paid_at: now,
        }];

        if let Some(event) = self.auto_complete(now) {
            events.push(event);
        }

        Ok(events)
    }

    /// Waive one of this loan's fines.
    ///
    /// Settling the last pending fine on a returned loan completes it.
    pub fn waive_fine(
        &mut self,
        fine_id: Uuid,
        reason: String,
        now: DateTime<Utc>,
    ) -> Result<Vec<LoanEvent>, DomainError> {
        let fine = self
            .fines
            .iter_mut()
            .find(|f| f.id() == fine_id)
            .ok_or(DomainError::FineNotFound(fine_id))?;

        fine.waive(reason.clone())?;

        let mut events = vec![LoanEvent::FineWaived {
            loan_id: self.id,
            fine_id,
            reason,
            waived_at: now,
        }];

        if let Some(event) = self.auto_complete(now) {
            events.push(event);
        }

        Ok(events)
    }

    // =========================================================================
    // Loan::complete()
    // =========================================================================

    /// Finish a returned loan with no pending fines.
    ///
    /// This transition normally happens on its own when the book comes back
    /// or the last fine is settled; calling it directly is only useful for
    /// callers reconciling state.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<LoanEvent, DomainError> {
        if self.status != LoanStatus::Returned {
            return Err(DomainError::invalid_state("complete the loan", &self.status));
        }
        if self.has_outstanding_fines() {
            let pending = self.fines.iter().filter(|f| f.is_pending()).count();
            return Err(DomainError::OutstandingFines { pending });
        }

        self.status = LoanStatus::Completed;
        Ok(LoanEvent::LoanCompleted {
            loan_id: self.id,
            completed_at: now,
        })
    }

    /// Completion check shared by the return and fine-settling paths.
    fn auto_complete(&mut self, now: DateTime<Utc>) -> Option<LoanEvent> {
        if self.status == LoanStatus::Returned && !self.has_outstanding_fines() {
            self.status = LoanStatus::Completed;
            Some(LoanEvent::LoanCompleted {
                loan_id: self.id,
                completed_at: now,
            })
        } else {
            None
        }
    }

    /// Append a fine and produce its event.
    fn issue(&mut self, fine: Fine) -> LoanEvent {
        let event = LoanEvent::FineIssued {
            loan_id: self.id,
            fine_id: fine.id(),
            fine_type: fine.fine_type(),
            amount: fine.amount().amount(),
            currency: fine.amount().currency().to_string(),
            reason: fine.reason().to_string(),
            issued_at: fine.issued_date(),
        };
        self.fines.push(fine);
        event
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// True once the book is back, including after completion.
    pub fn is_returned(&self) -> bool {
        matches!(self.status, LoanStatus::Returned | LoanStatus::Completed)
    }

    pub fn is_completed(&self) -> bool {
        self.status == LoanStatus::Completed
    }

    /// An active loan past its due date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == LoanStatus::Active && now > self.due_date
    }

    /// Whole days past due. Zero for anything not overdue.
    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        if self.is_overdue(now) {
            (now - self.due_date).num_days()
        } else {
            0
        }
    }

    /// Whole days from checkout to return, or to `now` while still out.
    pub fn loan_duration(&self, now: DateTime<Utc>) -> i64 {
        let end = self.return_date.unwrap_or(now);
        (end - self.loan_date).num_days()
    }

    pub fn has_outstanding_fines(&self) -> bool {
        self.fines.iter().any(|f| f.is_pending())
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn book_id(&self) -> Uuid {
        self.book_id
    }

    pub fn borrower_id(&self) -> Uuid {
        self.borrower_id
    }

    pub fn borrower_name(&self) -> &str {
        &self.borrower_name
    }

    pub fn borrower_email(&self) -> &str {
        &self.borrower_email
    }

    pub fn loan_date(&self) -> DateTime<Utc> {
        self.loan_date
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn return_date(&self) -> Option<DateTime<Utc>> {
        self.return_date
    }

    pub fn status(&self) -> &LoanStatus {
        &self.status
    }

    pub fn fines(&self) -> &[Fine] {
        &self.fines
    }

    pub fn fine(&self, fine_id: Uuid) -> Option<&Fine> {
        self.fines.iter().find(|f| f.id() == fine_id)
    }
}
