//! Transfer lifecycle: prepare, execute, cancel
//!
//! Pure state mutation over [`BankingState`]; no locking, no I/O. Callers
//! hold whatever synchronization wraps the state.

use chrono::Utc;

use tl_types::{AppError, AppResult, BankingState, BankingStatus, TransferDetails};

pub struct TransferService;

impl TransferService {
    /// Stage a transfer for user confirmation.
    ///
    /// Rejects non-positive amounts and amounts above the current balance;
    /// a rejection leaves the state in `Error` with no pending transfer.
    pub fn prepare_transfer(
        state: &mut BankingState,
        details: TransferDetails,
    ) -> AppResult<String> {
        if details.amount <= 0.0 {
            state.status = BankingStatus::Error;
            return Err(AppError::Agent(
                "Transfer amount must be greater than zero".to_string(),
            ));
        }
        if details.amount > state.balance {
            state.status = BankingStatus::Error;
            return Err(AppError::Agent(format!(
                "Insufficient funds: balance is RM {:.2}",
                state.balance
            )));
        }

        let message = format!(
            "Prepared a transfer of RM {:.2} to {}",
            details.amount, details.recipient_name
        );
        state.pending_transfer = Some(details);
        state.status = BankingStatus::ConfirmingPayment;
        Ok(message)
    }

    /// Execute the pending transfer after user confirmation.
    ///
    /// The balance is debited here and only here.
    pub fn execute_transfer(state: &mut BankingState) -> AppResult<String> {
        let Some(details) = state.pending_transfer.clone() else {
            state.status = BankingStatus::Error;
            return Err(AppError::Agent(
                "No pending transfer to confirm".to_string(),
            ));
        };

        // Balance may have changed since preparation
        if details.amount > state.balance {
            state.status = BankingStatus::Error;
            return Err(AppError::Agent(format!(
                "Insufficient funds: balance is RM {:.2}",
                state.balance
            )));
        }

        state.balance -= details.amount;
        let reference = details
            .reference
            .as_deref()
            .map(|r| format!(", ref: {r}"))
            .unwrap_or_default();
        state.transaction_history.push(format!(
            "{} — Sent RM {:.2} to {} ({}{})",
            Utc::now().format("%Y-%m-%d %H:%M"),
            details.amount,
            details.recipient_name,
            details.bank_name,
            reference
        ));
        state.pending_transfer = None;
        state.status = BankingStatus::Completed;

        Ok(format!(
            "Transferred RM {:.2} to {}. Your new balance is RM {:.2}.",
            details.amount, details.recipient_name, state.balance
        ))
    }

    /// Drop the pending transfer, back to idle
    pub fn cancel_transfer(state: &mut BankingState) {
        state.pending_transfer = None;
        state.status = BankingStatus::Idle;
    }
}
