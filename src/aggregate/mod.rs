//! Aggregate module
//!
//! Aggregate Root pattern: the Loan aggregate and the Fine entities it owns.

pub mod fine;
pub mod loan;

pub use fine::{Fine, FineStatus};
pub use loan::{Loan, LoanStatus};
pub use loan::{DEFAULT_LOAN_DURATION_DAYS, MAX_INITIAL_LOAN_DAYS, MAX_TOTAL_LOAN_DAYS};
