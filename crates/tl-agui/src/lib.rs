//! AG-UI protocol events and SSE framing
//!
//! The frontend consumes agent output as a stream of JSON events tagged with
//! a `type` discriminator (`RUN_STARTED`, `TEXT_MESSAGE_CONTENT`, ...), each
//! framed as one SSE `data:` line. This crate owns the event taxonomy, the
//! wire framing, and the id helpers — it never touches HTTP.

pub mod events;
pub mod ids;
pub mod sse;

pub use events::AgUiEvent;
pub use ids::{generate_event_id, generate_run_id, generate_thread_id};
pub use sse::{build_run_events, build_text_response, format_sse};
