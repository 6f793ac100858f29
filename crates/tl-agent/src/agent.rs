//! The scripted banking assistant
//!
//! Implements the gateway's channel-handler contract: reads the replayed
//! request body, takes the newest user text, keyword-dispatches to the tool
//! layer, and streams AG-UI events back as SSE.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use parking_lot::RwLock;
use regex::Regex;
use tracing::debug;

use tl_agui::{build_run_events, format_sse};
use tl_gateway::{
    AppHandler, MessageSink, MessageSource, RequestMessage, ResponseMessage, Scope,
    TransportResult, SSE_HEADERS,
};
use tl_guardrails::extract_last_user_message;
use tl_types::{BankingState, TransferDetails};

use crate::tools::{self, SharedBankingState};
use crate::vision;

const GREETING: &str =
    "Hi! I can check your balance, pay bills, and make transfers. What would you like to do?";
const TRANSFER_HINT: &str =
    "To make a payment, tell me the amount and recipient, e.g. \"transfer RM 50 to Aisyah\".";

/// Scripted agent driving the banking tool layer
pub struct BankingAgent {
    state: SharedBankingState,
    transfer_pattern: Regex,
}

impl BankingAgent {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            state: Arc::new(RwLock::new(BankingState::with_balance(initial_balance))),
            // "RM 50 to Aisyah binti Rahman" / "50.25 to Lim"
            transfer_pattern: Regex::new(
                r"(?i)(?:rm\s*)?(\d+(?:\.\d{1,2})?)\s+to\s+([A-Za-z][A-Za-z .'-]*)",
            )
            .expect("static transfer pattern compiles"),
        }
    }

    /// Handle to the shared banking state
    pub fn state(&self) -> SharedBankingState {
        self.state.clone()
    }

    /// Decide a reply for one user utterance.
    ///
    /// Returns the reply text and whether the state changed (and should be
    /// snapshotted into the event stream).
    fn dispatch(&self, text: &str) -> (String, bool) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return (GREETING.to_string(), false);
        }
        let lowered = trimmed.to_lowercase();

        if lowered.contains("cancel") {
            tools::cancel_transfer(&self.state);
            return ("I've cancelled the pending transfer.".to_string(), true);
        }

        if lowered.contains("confirm") || lowered.starts_with("yes") {
            return match tools::confirm_transfer(&self.state) {
                Ok(message) => (message, true),
                Err(e) => (format!("I couldn't complete that transfer: {e}"), true),
            };
        }

        if lowered.contains("balance") {
            return (
                format!(
                    "Your current balance is RM {:.2}.",
                    tools::get_balance(&self.state)
                ),
                false,
            );
        }

        if lowered.contains("bill") || lowered.contains("receipt") {
            return (vision::analyze_bill_image(trimmed), false);
        }

        if lowered.contains("transfer") || lowered.contains("pay") || lowered.contains("send") {
            let Some(details) = self.parse_transfer(trimmed) else {
                return (TRANSFER_HINT.to_string(), false);
            };
            return match tools::prepare_transfer(&self.state, details) {
                Ok(message) => (
                    format!("{message}. Reply \"confirm\" to execute or \"cancel\" to abort."),
                    true,
                ),
                Err(e) => (format!("I couldn't prepare that transfer: {e}"), true),
            };
        }

        (GREETING.to_string(), false)
    }

    fn parse_transfer(&self, text: &str) -> Option<TransferDetails> {
        let captures = self.transfer_pattern.captures(text)?;
        let amount: f64 = captures.get(1)?.as_str().parse().ok()?;
        let recipient = captures.get(2)?.as_str().trim().to_string();
        Some(TransferDetails {
            recipient_name: recipient,
            bank_name: "On-file bank".to_string(),
            account_number: "on-file".to_string(),
            amount,
            reference: None,
        })
    }
}

#[async_trait]
impl AppHandler for BankingAgent {
    async fn handle(
        &self,
        scope: &Scope,
        source: &mut dyn MessageSource,
        sink: &mut dyn MessageSink,
    ) -> TransportResult<()> {
        let body = read_body(source).await?;
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap_or_else(|e| {
            debug!("Agent received non-JSON body: {e}");
            serde_json::Value::Null
        });
        let text = extract_last_user_message(&parsed)
            .into_iter()
            .next()
            .unwrap_or_default();

        debug!("Agent handling {} with input: {:.80}", scope.path, text);
        let (reply, state_changed) = self.dispatch(&text);

        let snapshot = if state_changed {
            Some(serde_json::to_value(&*self.state.read()).unwrap_or_default())
        } else {
            None
        };

        sink.send(ResponseMessage::Start {
            status: 200,
            headers: SSE_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        })
        .await?;

        for event in build_run_events(&reply, snapshot) {
            sink.send(ResponseMessage::Body {
                body: Bytes::from(format_sse(&event)),
                more_body: true,
            })
            .await?;
        }

        sink.send(ResponseMessage::Body {
            body: Bytes::new(),
            more_body: false,
        })
        .await
    }
}

/// Drain the request body to completion
async fn read_body(source: &mut dyn MessageSource) -> TransportResult<Bytes> {
    let mut body = BytesMut::new();
    loop {
        match source.next_message().await? {
            RequestMessage::Body {
                body: chunk,
                more_body,
            } => {
                body.extend_from_slice(&chunk);
                if !more_body {
                    break;
                }
            }
            RequestMessage::Disconnect => break,
        }
    }
    Ok(body.freeze())
}
