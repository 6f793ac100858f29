//! Shared types, error types, and the banking data model for Teller

pub mod banking;
pub mod errors;

pub use banking::{BankingState, BankingStatus, BillDetails, TransferDetails};
pub use errors::{AppError, AppResult};
