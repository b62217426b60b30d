//! Circulation Service
//!
//! Orchestrates the lending workflows. Each call resolves its collaborators,
//! applies exactly one aggregate operation, and persists the result.

use chrono::Utc;
use uuid::Uuid;

use crate::aggregate::{Loan, DEFAULT_LOAN_DURATION_DAYS};
use crate::domain::{determine_borrower_id, Actor, LoanEvent, Money};
use crate::error::{ServiceError, ServiceResult};

use super::commands::{CheckOutBookCommand, CheckOutResult};
use super::traits::{BookCatalog, BorrowerDirectory, LoanStore};

/// Service for the loan lifecycle
pub struct CirculationService<C, D, S> {
    catalog: C,
    directory: D,
    loans: S,
}

impl<C, D, S> CirculationService<C, D, S>
where
    C: BookCatalog,
    D: BorrowerDirectory,
    S: LoanStore,
{
    pub fn new(catalog: C, directory: D, loans: S) -> Self {
        Self {
            catalog,
            directory,
            loans,
        }
    }

    // =========================================================================
    // CirculationService::check_out_book()
    // =========================================================================

    /// Check a book out for the actor, or for another borrower when the
    /// actor is privileged.
    pub fn check_out_book(
        &self,
        command: CheckOutBookCommand,
        actor: &Actor,
    ) -> ServiceResult<CheckOutResult> {
        if !self.catalog.book_exists(command.book_id)? {
            return Err(ServiceError::BookNotFound(command.book_id));
        }

        // One active loan per book; the store answers atomically.
        if self
            .loans
            .find_active_loan_for_book(command.book_id)?
            .is_some()
        {
            return Err(ServiceError::BookAlreadyOnLoan(command.book_id));
        }

        let borrower_id = determine_borrower_id(command.borrower_id, actor)?;

        let profile = self
            .directory
            .find_borrower(borrower_id)?
            .ok_or(ServiceError::BorrowerNotFound(borrower_id))?;

        let duration_days = command.duration_days.unwrap_or(DEFAULT_LOAN_DURATION_DAYS);
        let (loan, event) = Loan::create(
            command.book_id,
            borrower_id,
            profile.name,
            profile.email,
            duration_days,
            Utc::now(),
        )?;

        self.loans.insert(&loan)?;

        tracing::info!(
            loan_id = %loan.id(),
            book_id = %command.book_id,
            borrower_id = %borrower_id,
            due_date = %loan.due_date(),
            "Book checked out"
        );

        Ok(CheckOutResult {
            loan_id: loan.id(),
            book_id: command.book_id,
            borrower_id,
            due_date: loan.due_date(),
            events: vec![event],
        })
    }

    // =========================================================================
    // Loan operations
    // =========================================================================

    /// Push a loan's due date back
    pub fn extend_due_date(
        &self,
        loan_id: Uuid,
        additional_days: i64,
    ) -> ServiceResult<Vec<LoanEvent>> {
        let mut loan = self.load(loan_id)?;
        let events = loan.extend_due_date(additional_days, Utc::now())?;
        self.loans.update(&loan)?;

        tracing::info!(
            loan_id = %loan_id,
            additional_days = additional_days,
            due_date = %loan.due_date(),
            "Due date extended"
        );
        Ok(events)
    }

    /// Take a book back
    pub fn return_book(&self, loan_id: Uuid) -> ServiceResult<Vec<LoanEvent>> {
        let mut loan = self.load(loan_id)?;
        let events = loan.return_book(Utc::now())?;
        self.loans.update(&loan)?;

        tracing::info!(
            loan_id = %loan_id,
            status = %loan.status(),
            fines = loan.fines().len(),
            "Book returned"
        );
        Ok(events)
    }

    /// Report a book as lost
    pub fn mark_as_lost(
        &self,
        loan_id: Uuid,
        replacement_cost: Option<Money>,
    ) -> ServiceResult<Vec<LoanEvent>> {
        let mut loan = self.load(loan_id)?;
        let events = loan.mark_as_lost(replacement_cost, Utc::now())?;
        self.loans.update(&loan)?;

        tracing::warn!(loan_id = %loan_id, book_id = %loan.book_id(), "Book marked as lost");
        Ok(events)
    }

    /// Raise a damage fine against a loan
    pub fn report_damage(
        &self,
        loan_id: Uuid,
        description: String,
        cost: Money,
    ) -> ServiceResult<Vec<LoanEvent>> {
        let mut loan = self.load(loan_id)?;
        let events = loan.report_damage(description, cost, Utc::now())?;
        self.loans.update(&loan)?;

        tracing::info!(loan_id = %loan_id, "Damage reported");
        Ok(events)
    }

    /// Pay one of a loan's fines
    pub fn pay_fine(
        &self,
        loan_id: Uuid,
        fine_id: Uuid,
        payment_reference: String,
    ) -> ServiceResult<Vec<LoanEvent>> {
        let mut loan = self.load(loan_id)?;
        let events = loan.pay_fine(fine_id, payment_reference, Utc::now())?;
        self.loans.update(&loan)?;

        tracing::info!(
            loan_id = %loan_id,
            fine_id = %fine_id,
            status = %loan.status(),
            "Fine paid"
        );
        Ok(events)
    }

    /// Waive one of a loan's fines
    pub fn waive_fine(
        &self,
        loan_id: Uuid,
        fine_id: Uuid,
        reason: String,
    ) -> ServiceResult<Vec<LoanEvent>> {
        let mut loan = self.load(loan_id)?;
        let events = loan.waive_fine(fine_id, reason, Utc::now())?;
        self.loans.update(&loan)?;

        tracing::info!(
            loan_id = %loan_id,
            fine_id = %fine_id,
            status = %loan.status(),
            "Fine waived"
        );
        Ok(events)
    }

    /// Read a loan's current state
    pub fn get_loan(&self, loan_id: Uuid) -> ServiceResult<Loan> {
        self.load(loan_id)
    }

    fn load(&self, loan_id: Uuid) -> ServiceResult<Loan> {
        self.loans
            .find_loan(loan_id)?
            .ok_or(ServiceError::LoanNotFound(loan_id))
    }
}
