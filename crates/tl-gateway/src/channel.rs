//! The abstract transport channel the gateway speaks
//!
//! Inbound request framing and outbound response framing follow the standard
//! two-phase shape: body chunks with a continuation flag, response start
//! before body chunks. Concrete transports (the axum bridge, in-memory test
//! channels) adapt to these traits.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// One inbound transport message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMessage {
    /// A body fragment; `more_body=false` marks the end of the request body
    Body { body: Bytes, more_body: bool },
    /// The client went away
    Disconnect,
}

/// One outbound transport message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseMessage {
    /// Response metadata; sent exactly once, before any body chunk
    Start {
        status: u16,
        headers: Vec<(String, String)>,
    },
    /// A body fragment; `more_body=false` marks the terminal chunk
    Body { body: Bytes, more_body: bool },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("channel closed")]
    Closed,
    #[error("transport failure: {0}")]
    Failed(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Source of inbound request messages
#[async_trait]
pub trait MessageSource: Send {
    async fn next_message(&mut self) -> TransportResult<RequestMessage>;
}

/// Sink for outbound response messages
#[async_trait]
pub trait MessageSink: Send {
    async fn send(&mut self, message: ResponseMessage) -> TransportResult<()>;
}

#[async_trait]
impl<T: MessageSource + ?Sized> MessageSource for &mut T {
    async fn next_message(&mut self) -> TransportResult<RequestMessage> {
        (**self).next_message().await
    }
}

#[async_trait]
impl<T: MessageSink + ?Sized> MessageSink for &mut T {
    async fn send(&mut self, message: ResponseMessage) -> TransportResult<()> {
        (**self).send(message).await
    }
}

/// Request metadata available before any body byte is read
#[derive(Debug, Clone)]
pub struct Scope {
    /// HTTP method, uppercase
    pub method: String,
    /// Request path
    pub path: String,
    /// Client address, when the transport knows it
    pub client: Option<SocketAddr>,
}

impl Scope {
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: "POST".to_string(),
            path: path.into(),
            client: None,
        }
    }
}

/// A downstream application in channel-handler shape.
///
/// The gateway wraps any implementation transparently: on a pass decision
/// the handler observes a request identical to what the client sent.
#[async_trait]
pub trait AppHandler: Send + Sync {
    async fn handle(
        &self,
        scope: &Scope,
        source: &mut dyn MessageSource,
        sink: &mut dyn MessageSink,
    ) -> TransportResult<()>;
}

#[async_trait]
impl<T: AppHandler + ?Sized> AppHandler for Arc<T> {
    async fn handle(
        &self,
        scope: &Scope,
        source: &mut dyn MessageSource,
        sink: &mut dyn MessageSink,
    ) -> TransportResult<()> {
        (**self).handle(scope, source, sink).await
    }
}

/// In-memory source fed from a fixed message list.
///
/// Yields the queued messages in order, then `Disconnect` forever. Useful
/// for tests and for embedding the gateway outside a live transport.
#[derive(Debug, Default)]
pub struct StaticSource {
    messages: VecDeque<RequestMessage>,
}

impl StaticSource {
    pub fn new(messages: impl IntoIterator<Item = RequestMessage>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
        }
    }

    /// A source holding a whole body as one terminal chunk
    pub fn from_body(body: impl Into<Bytes>) -> Self {
        Self::new([RequestMessage::Body {
            body: body.into(),
            more_body: false,
        }])
    }
}

#[async_trait]
impl MessageSource for StaticSource {
    async fn next_message(&mut self) -> TransportResult<RequestMessage> {
        Ok(self
            .messages
            .pop_front()
            .unwrap_or(RequestMessage::Disconnect))
    }
}

/// In-memory sink collecting everything sent through it
#[derive(Debug, Default)]
pub struct CollectorSink {
    pub sent: Vec<ResponseMessage>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenated bytes of all body chunks sent so far
    pub fn body_bytes(&self) -> Vec<u8> {
        self.sent
            .iter()
            .filter_map(|m| match m {
                ResponseMessage::Body { body, .. } => Some(body.as_ref()),
                ResponseMessage::Start { .. } => None,
            })
            .collect::<Vec<_>>()
            .concat()
    }
}

#[async_trait]
impl MessageSink for CollectorSink {
    async fn send(&mut self, message: ResponseMessage) -> TransportResult<()> {
        self.sent.push(message);
        Ok(())
    }
}
