//! Circulation Services module
//!
//! Application services that orchestrate loan operations.
//! Each service coordinates aggregates, catalog lookups, and the loan store.

mod circulation;
mod commands;
mod memory;
mod traits;

#[cfg(test)]
mod tests;

pub use circulation::CirculationService;
pub use commands::*;
pub use memory::{InMemoryBookCatalog, InMemoryBorrowerDirectory, InMemoryLoanStore};
pub use traits::{BookCatalog, BorrowerDirectory, BorrowerProfile, LoanStore};
