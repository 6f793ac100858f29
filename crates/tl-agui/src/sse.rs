//! Building and framing AG-UI event sequences

use crate::events::AgUiEvent;
use crate::ids::{generate_event_id, generate_run_id, generate_thread_id};

/// Build the full event sequence for one assistant run.
///
/// Emits `RUN_STARTED`, an optional `STATE_SNAPSHOT`, a complete text message
/// carrying `message` as a single content chunk, then `RUN_FINISHED`.
pub fn build_run_events(message: &str, snapshot: Option<serde_json::Value>) -> Vec<AgUiEvent> {
    let thread_id = generate_thread_id();
    let run_id = generate_run_id();
    let message_id = generate_event_id();

    let mut events = Vec::with_capacity(7);
    events.push(AgUiEvent::RunStarted {
        thread_id: thread_id.clone(),
        run_id: run_id.clone(),
    });
    if let Some(snapshot) = snapshot {
        events.push(AgUiEvent::StateSnapshot { snapshot });
    }
    events.push(AgUiEvent::TextMessageStart {
        message_id: message_id.clone(),
        role: "assistant".to_string(),
    });
    events.push(AgUiEvent::TextMessageContent {
        message_id: message_id.clone(),
        delta: message.to_string(),
    });
    events.push(AgUiEvent::TextMessageEnd { message_id });
    events.push(AgUiEvent::RunFinished { thread_id, run_id });
    events
}

/// Build the event sequence for a plain text assistant response
pub fn build_text_response(message: &str) -> Vec<AgUiEvent> {
    build_run_events(message, None)
}

/// Serialize one event to SSE wire framing: `data: <json>\n\n`.
///
/// Pure: the same event always produces the same bytes.
pub fn format_sse(event: &AgUiEvent) -> Vec<u8> {
    // AgUiEvent payloads are plain strings and JSON values; serialization
    // cannot fail for them.
    let json = serde_json::to_string(event).unwrap_or_default();
    format!("data: {json}\n\n").into_bytes()
}
