//! AG-UI event taxonomy
//!
//! Events are tagged with a SCREAMING_SNAKE `type` discriminator and carry
//! camelCase payload fields, matching what the AG-UI frontend expects.

use serde::{Deserialize, Serialize};

/// One unit of the outbound agent-UI event stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum AgUiEvent {
    /// A run has begun processing
    RunStarted { thread_id: String, run_id: String },
    /// Opens an assistant text message
    TextMessageStart { message_id: String, role: String },
    /// One chunk of assistant text
    TextMessageContent { message_id: String, delta: String },
    /// Closes an assistant text message
    TextMessageEnd { message_id: String },
    /// Full snapshot of the shared agent state
    StateSnapshot { snapshot: serde_json::Value },
    /// The run has completed
    RunFinished { thread_id: String, run_id: String },
}

impl AgUiEvent {
    /// Discriminator string as it appears on the wire
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "RUN_STARTED",
            Self::TextMessageStart { .. } => "TEXT_MESSAGE_START",
            Self::TextMessageContent { .. } => "TEXT_MESSAGE_CONTENT",
            Self::TextMessageEnd { .. } => "TEXT_MESSAGE_END",
            Self::StateSnapshot { .. } => "STATE_SNAPSHOT",
            Self::RunFinished { .. } => "RUN_FINISHED",
        }
    }
}
