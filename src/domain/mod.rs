//! Domain module
//!
//! Core domain types and business logic.

pub mod borrower;
pub mod error;
pub mod events;
pub mod money;

pub use borrower::{determine_borrower_id, Actor, Role};
pub use error::{DomainError, ErrorKind};
pub use events::{FineType, LoanEvent};
pub use money::Money;
