//! Tools the agent invokes against shared banking state
//!
//! Each tool takes the shared state handle, logs its invocation, and
//! delegates the actual mutation to [`TransferService`].

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info};

use tl_types::{AppResult, BankingState, TransferDetails};

use crate::service::TransferService;

pub type SharedBankingState = Arc<RwLock<BankingState>>;

/// Prepare a bank transfer or bill payment for user confirmation
pub fn prepare_transfer(state: &SharedBankingState, details: TransferDetails) -> AppResult<String> {
    info!(
        "Executing tool: prepare_transfer (recipient={}, amount=RM {:.2})",
        details.recipient_name, details.amount
    );
    let result = TransferService::prepare_transfer(&mut state.write(), details);
    if let Err(e) = &result {
        error!("Transfer preparation failed: {e}");
    }
    result
}

/// Execute the pending transfer after user confirmation
pub fn confirm_transfer(state: &SharedBankingState) -> AppResult<String> {
    info!("Executing tool: confirm_transfer");
    let result = TransferService::execute_transfer(&mut state.write());
    if let Err(e) = &result {
        error!("Transfer confirmation failed: {e}");
    }
    result
}

/// Cancel the pending transfer
pub fn cancel_transfer(state: &SharedBankingState) {
    info!("Executing tool: cancel_transfer");
    TransferService::cancel_transfer(&mut state.write());
}

/// Current account balance
pub fn get_balance(state: &SharedBankingState) -> f64 {
    state.read().balance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_state() -> SharedBankingState {
        Arc::new(RwLock::new(BankingState::default()))
    }

    fn details(amount: f64) -> TransferDetails {
        TransferDetails {
            recipient_name: "Lim".to_string(),
            bank_name: "CIMB".to_string(),
            account_number: "9876543210".to_string(),
            amount,
            reference: Some("rent".to_string()),
        }
    }

    #[test]
    fn test_full_tool_flow() {
        let state = shared_state();
        assert_eq!(get_balance(&state), 1000.0);

        prepare_transfer(&state, details(400.0)).unwrap();
        confirm_transfer(&state).unwrap();
        assert_eq!(get_balance(&state), 600.0);
    }

    #[test]
    fn test_cancel_flow() {
        let state = shared_state();
        prepare_transfer(&state, details(400.0)).unwrap();
        cancel_transfer(&state);
        assert!(state.read().pending_transfer.is_none());
        assert_eq!(get_balance(&state), 1000.0);
    }
}
