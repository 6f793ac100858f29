//! Buffer-and-replay message source
//!
//! After the gateway has drained a request body for inspection, the
//! downstream handler still has to observe the original message sequence.
//! [`ReplaySource`] wraps the live source and first yields every buffered
//! message, in original order, before falling back to live reads — an
//! explicit two-state machine so the exactly-once, in-order contract is
//! independently testable.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::channel::{MessageSource, RequestMessage, TransportResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplayState {
    /// Still handing out buffered messages
    Replaying,
    /// Buffer exhausted; reads go to the live source
    Live,
}

/// Message source that replays buffered messages before live reads
#[derive(Debug)]
pub struct ReplaySource<S> {
    buffered: VecDeque<RequestMessage>,
    inner: S,
    state: ReplayState,
}

impl<S: MessageSource> ReplaySource<S> {
    pub fn new(buffered: Vec<RequestMessage>, inner: S) -> Self {
        Self {
            buffered: buffered.into(),
            inner,
            state: ReplayState::Replaying,
        }
    }
}

#[async_trait]
impl<S: MessageSource> MessageSource for ReplaySource<S> {
    async fn next_message(&mut self) -> TransportResult<RequestMessage> {
        if self.state == ReplayState::Replaying {
            if let Some(message) = self.buffered.pop_front() {
                return Ok(message);
            }
            self.state = ReplayState::Live;
        }
        self.inner.next_message().await
    }
}
