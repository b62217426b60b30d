//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Classification of a domain failure.
///
/// `InvalidArgument` means a caller-supplied value violated a precondition.
/// `InvalidOperation` means the request was well-formed but is not allowed
/// in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidOperation,
}

/// Domain-specific errors
///
/// These errors represent business rule violations and domain invariant
/// failures. They are independent of the service/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Monetary amount below zero
    #[error("Amount cannot be negative (got {0})")]
    NegativeAmount(Decimal),

    /// Currency code is not exactly 3 characters
    #[error("Currency must be a 3-letter code (got {0:?})")]
    InvalidCurrency(String),

    /// A required text field is empty or whitespace
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    /// Multiplication factor below zero
    #[error("Cannot multiply an amount by a negative factor (got {0})")]
    NegativeMultiplier(Decimal),

    /// Money could not be parsed from its string form
    #[error("Invalid money format: {0}")]
    MoneyParse(String),

    /// Currencies differ where they must match
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    /// Subtraction would produce a negative amount
    #[error("Operation would result in a negative amount")]
    NegativeResult,

    /// Decimal arithmetic overflowed
    #[error("Amount arithmetic overflowed")]
    AmountOverflow,

    /// A required id is the nil UUID
    #[error("{field} cannot be empty")]
    NilId { field: &'static str },

    /// Initial loan duration outside the allowed range
    #[error("Loan duration must be between 1 and {max_days} days (got {days})")]
    InvalidLoanDuration { days: i64, max_days: i64 },

    /// Extension days must be positive
    #[error("Extension days must be positive (got {0})")]
    InvalidExtension(i64),

    /// Operation not allowed for the loan's current status
    #[error("Cannot {action} while the loan status is {status}")]
    InvalidLoanState {
        action: &'static str,
        status: String,
    },

    /// Overdue loans cannot be extended
    #[error("Cannot extend the due date of an overdue loan ({days_overdue} days past due)")]
    OverdueLoan { days_overdue: i64 },

    /// Extension would push the total duration past the cap
    #[error("Cannot extend the loan beyond {max_days} days of total duration (would be {total_days})")]
    DurationCapExceeded { total_days: i64, max_days: i64 },

    /// Completion attempted with pending fines
    #[error("Cannot complete a loan with outstanding fines ({pending} pending)")]
    OutstandingFines { pending: usize },

    /// No fine with this id belongs to the loan
    #[error("Fine not found: {0}")]
    FineNotFound(Uuid),

    /// Fine is already paid or waived
    #[error("Fine has already been {status}")]
    FineAlreadySettled { status: String },

    /// Damage cost must be above zero
    #[error("Damage cost must be positive (got {0})")]
    NonPositiveCost(Decimal),

    /// Actor carries no identity claim
    #[error("User identity not found")]
    MissingIdentity,

    /// Identity claim is not a valid UUID
    #[error("Invalid user identity: {0}")]
    MalformedIdentity(String),

    /// Actor may not create loans for other borrowers
    #[error("Members can only create loans for themselves")]
    BorrowerNotPermitted,
}

impl DomainError {
    /// Create an empty-field error
    pub fn empty(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    /// Create a nil-id error
    pub fn nil_id(field: &'static str) -> Self {
        Self::NilId { field }
    }

    /// Create an invalid-loan-state error
    pub fn invalid_state(action: &'static str, status: impl std::fmt::Display) -> Self {
        Self::InvalidLoanState {
            action,
            status: status.to_string(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NegativeAmount(_)
            | Self::InvalidCurrency(_)
            | Self::EmptyField { .. }
            | Self::NegativeMultiplier(_)
            | Self::MoneyParse(_)
            | Self::NilId { .. }
            | Self::InvalidLoanDuration { .. }
            | Self::InvalidExtension(_)
            | Self::FineNotFound(_)
            | Self::NonPositiveCost(_)
            | Self::MissingIdentity => ErrorKind::InvalidArgument,

            Self::CurrencyMismatch { .. }
            | Self::NegativeResult
            | Self::AmountOverflow
            | Self::InvalidLoanState { .. }
            | Self::OverdueLoan { .. }
            | Self::DurationCapExceeded { .. }
            | Self::OutstandingFines { .. }
            | Self::FineAlreadySettled { .. }
            | Self::MalformedIdentity(_)
            | Self::BorrowerNotPermitted => ErrorKind::InvalidOperation,
        }
    }

    /// Check if this is a rejected input (caller passed a bad value)
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    /// Check if this is a rejected state transition
    pub fn is_invalid_operation(&self) -> bool {
        self.kind() == ErrorKind::InvalidOperation
    }
}
