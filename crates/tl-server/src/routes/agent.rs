//! POST /agent — the chat endpoint, behind the guardrail gateway

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, error};

use tl_gateway::{ResponseMessage, Scope};

use crate::bridge::{ChannelSink, HttpMessageSource};
use crate::state::AppState;

/// Run one chat exchange through the gateway.
///
/// The request body is handed to the gateway as a message stream; whatever
/// the gateway (or the agent behind it) sends back is streamed out as the
/// HTTP response. The first outbound message fixes status and headers.
pub async fn agent_chat(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let scope = Scope {
        method: parts.method.as_str().to_string(),
        path: parts.uri.path().to_string(),
        client: parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr),
    };

    let (tx, mut rx) = mpsc::channel::<ResponseMessage>(16);
    let gateway = state.gateway.clone();
    tokio::spawn(async move {
        let mut source = HttpMessageSource::new(body.into_data_stream());
        let mut sink = ChannelSink::new(tx);
        if let Err(e) = gateway.handle(&scope, &mut source, &mut sink).await {
            // The client is gone or the exchange broke mid-stream; nothing
            // left to deliver the error to.
            debug!("Agent exchange ended with transport error: {e}");
        }
    });

    let Some(ResponseMessage::Start { status, headers }) = rx.recv().await else {
        error!("Gateway produced no response start");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let body_stream = async_stream::stream! {
        while let Some(message) = rx.recv().await {
            if let ResponseMessage::Body { body, more_body } = message {
                yield Ok::<Bytes, std::convert::Infallible>(body);
                if !more_body {
                    break;
                }
            }
        }
    };

    let mut builder =
        Response::builder().status(StatusCode::from_u16(status).unwrap_or(StatusCode::OK));
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
        .body(Body::from_stream(body_stream))
        .unwrap_or_else(|e| {
            error!("Failed to assemble response: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}
