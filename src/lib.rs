//! circulation Library
//!
//! Loan lifecycle management for a lending library: checkout, due-date
//! extension, returns, lost books, and fine settlement.

pub mod aggregate;
pub mod domain;
pub mod service;

mod error;

pub use error::{ServiceError, ServiceResult, StorageError};

pub use aggregate::{Fine, FineStatus, Loan, LoanStatus};
pub use domain::{Actor, DomainError, ErrorKind, FineType, LoanEvent, Money, Role};
pub use service::{CheckOutBookCommand, CheckOutResult, CirculationService};
