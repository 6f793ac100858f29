//! Guardrail gateway
//!
//! A request-interception layer in front of any channel-style handler. For
//! HTTP POSTs it buffers the body, runs the guardrail registry against the
//! extracted user text, and either replays the buffered request to the
//! downstream handler byte-for-byte or short-circuits the exchange with a
//! fabricated AG-UI event stream (status 200).
//!
//! The transport is abstract: anything that can produce [`RequestMessage`]s
//! and accept [`ResponseMessage`]s can sit behind the gateway. The axum
//! bridge in `tl-server` is one such adapter.

pub mod channel;
pub mod middleware;
pub mod replay;

pub use channel::{
    AppHandler, CollectorSink, MessageSink, MessageSource, RequestMessage, ResponseMessage, Scope,
    StaticSource, TransportError, TransportResult,
};
pub use middleware::{GuardrailGateway, SSE_HEADERS};
pub use replay::ReplaySource;
