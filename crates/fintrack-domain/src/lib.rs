//! fintrack-domain
//!
//! Pure domain models (Income, Expense, RecurringTransaction, SavingsVaultGoal)
//! and calendar arithmetic. No I/O, no storage, no clock access.

pub mod common;
pub mod error;
pub mod recurring;
pub mod savings;
pub mod transaction;

pub use common::*;
pub use error::DomainError;
pub use recurring::*;
pub use savings::*;
pub use transaction::*;
