//! Adapters between axum HTTP bodies and the gateway channel

use async_trait::async_trait;
use axum::body::BodyDataStream;
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::sync::mpsc;

use tl_gateway::{
    MessageSink, MessageSource, RequestMessage, ResponseMessage, TransportError, TransportResult,
};

/// Reads an HTTP request body as a sequence of transport messages.
///
/// Hyper only signals end-of-body by exhausting the stream, so every data
/// chunk is emitted with `more_body=true` and a final empty chunk carries
/// the terminal flag. After that, reads yield `Disconnect`.
pub struct HttpMessageSource {
    stream: BodyDataStream,
    finished: bool,
}

impl HttpMessageSource {
    pub fn new(stream: BodyDataStream) -> Self {
        Self {
            stream,
            finished: false,
        }
    }
}

#[async_trait]
impl MessageSource for HttpMessageSource {
    async fn next_message(&mut self) -> TransportResult<RequestMessage> {
        if self.finished {
            return Ok(RequestMessage::Disconnect);
        }
        match self.stream.next().await {
            Some(Ok(chunk)) => Ok(RequestMessage::Body {
                body: chunk,
                more_body: true,
            }),
            Some(Err(e)) => {
                self.finished = true;
                Err(TransportError::Failed(e.to_string()))
            }
            None => {
                self.finished = true;
                Ok(RequestMessage::Body {
                    body: Bytes::new(),
                    more_body: false,
                })
            }
        }
    }
}

/// Forwards outbound response messages into an mpsc channel, from which the
/// HTTP response is assembled
pub struct ChannelSink {
    tx: mpsc::Sender<ResponseMessage>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<ResponseMessage>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send(&mut self, message: ResponseMessage) -> TransportResult<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| TransportError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn test_source_frames_body_with_terminal_chunk() {
        let body = Body::from("hello");
        let mut source = HttpMessageSource::new(body.into_data_stream());

        assert_eq!(
            source.next_message().await.unwrap(),
            RequestMessage::Body {
                body: Bytes::from_static(b"hello"),
                more_body: true,
            }
        );
        assert_eq!(
            source.next_message().await.unwrap(),
            RequestMessage::Body {
                body: Bytes::new(),
                more_body: false,
            }
        );
        assert_eq!(
            source.next_message().await.unwrap(),
            RequestMessage::Disconnect
        );
    }

    #[tokio::test]
    async fn test_empty_body_yields_single_terminal_chunk() {
        let mut source = HttpMessageSource::new(Body::empty().into_data_stream());
        assert_eq!(
            source.next_message().await.unwrap(),
            RequestMessage::Body {
                body: Bytes::new(),
                more_body: false,
            }
        );
    }

    #[tokio::test]
    async fn test_sink_forwards_into_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut sink = ChannelSink::new(tx);
        let message = ResponseMessage::Body {
            body: Bytes::from_static(b"x"),
            more_body: false,
        };
        sink.send(message.clone()).await.unwrap();
        assert_eq!(rx.recv().await, Some(message));
    }

    #[tokio::test]
    async fn test_sink_reports_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut sink = ChannelSink::new(tx);
        let result = sink
            .send(ResponseMessage::Body {
                body: Bytes::new(),
                more_body: false,
            })
            .await;
        assert!(matches!(result, Err(TransportError::Closed)));
    }
}
