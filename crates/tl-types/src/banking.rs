//! Banking data model shared between the agent tools and the server
//!
//! The state snapshot is serialized verbatim into AG-UI `STATE_SNAPSHOT`
//! events, so field names here are part of the frontend contract.

use serde::{Deserialize, Serialize};

/// Where the assistant currently is in a payment flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BankingStatus {
    #[default]
    Idle,
    ConfirmingPayment,
    Completed,
    Error,
}

/// Details for a bank transfer or bill payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferDetails {
    /// Name of the recipient
    pub recipient_name: String,
    /// Name of the recipient's bank
    pub bank_name: String,
    /// Recipient's account number
    pub account_number: String,
    /// Amount to transfer
    pub amount: f64,
    /// Optional payment reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Details extracted from a bill or receipt image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillDetails {
    /// Name of the biller (e.g. TNB, Syabas)
    pub payee_name: String,
    /// Account number on the bill
    pub account_number: String,
    /// Amount to be paid
    pub amount: f64,
    /// Due date if the bill carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Current state of the banking assistant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BankingState {
    /// User's current mock balance
    pub balance: f64,
    /// Transfer currently awaiting confirmation
    pub pending_transfer: Option<TransferDetails>,
    /// Recent transaction messages, newest last
    pub transaction_history: Vec<String>,
    pub status: BankingStatus,
}

impl Default for BankingState {
    fn default() -> Self {
        Self {
            balance: 1000.0,
            pending_transfer: None,
            transaction_history: Vec::new(),
            status: BankingStatus::Idle,
        }
    }
}

impl BankingState {
    /// Create a state with a starting balance
    pub fn with_balance(balance: f64) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = BankingState::default();
        assert_eq!(state.balance, 1000.0);
        assert!(state.pending_transfer.is_none());
        assert!(state.transaction_history.is_empty());
        assert_eq!(state.status, BankingStatus::Idle);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&BankingStatus::ConfirmingPayment).unwrap();
        assert_eq!(json, "\"confirming_payment\"");
    }

    #[test]
    fn test_transfer_details_omits_missing_reference() {
        let details = TransferDetails {
            recipient_name: "Aisyah".to_string(),
            bank_name: "Maybank".to_string(),
            account_number: "1234567890".to_string(),
            amount: 250.0,
            reference: None,
        };
        let json = serde_json::to_value(&details).unwrap();
        assert!(json.get("reference").is_none());
    }
}
