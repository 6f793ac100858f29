//! The banking agent and its tool layer
//!
//! A scripted (non-LLM) assistant that simulates bill payments and
//! transfers against mock state. It sits downstream of the guardrail
//! gateway and is only reachable after a "pass" decision; the gateway never
//! depends on anything in here beyond the channel-handler contract.

pub mod agent;
pub mod service;
pub mod tools;
pub mod vision;

pub use agent::BankingAgent;
pub use service::TransferService;
pub use tools::SharedBankingState;
