//! Web server module
//!
//! Exposes the banking agent over HTTP using Axum:
//! - `POST /agent` — chat endpoint, guarded by the guardrail gateway
//! - `GET /health` — liveness
//!
//! Guardrail enforcement happens inside the gateway, not as an axum layer,
//! so the buffer/decide/replay pipeline stays transport-agnostic and
//! testable without HTTP.

pub mod bridge;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use tl_agent::BankingAgent;
use tl_config::ServerConfig;
use tl_guardrails::GuardrailRegistry;

pub use state::AppState;

/// Build the router
pub fn build_app(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/agent", post(routes::agent::agent_chat))
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }
    app
}

/// Start the web server.
///
/// Binds to the configured port, incrementing on collision. Returns the
/// shared state, the serve task handle, and the port actually used.
pub async fn start_server(
    config: ServerConfig,
    registry: Arc<GuardrailRegistry>,
    agent: Arc<BankingAgent>,
) -> anyhow::Result<(AppState, tokio::task::JoinHandle<()>, u16)> {
    info!("Starting web server on {}:{}", config.host, config.port);

    let state = AppState::new(registry, agent);
    let app = build_app(state.clone(), config.enable_cors);

    let host_ip = config.host.parse::<std::net::IpAddr>()?;
    let (listener, port) = bind_with_retry(host_ip, config.port, 100).await?;
    if port != config.port {
        info!("Port {} was taken, using port {} instead", config.port, port);
    }

    info!("Web server listening on http://{}:{}", config.host, port);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        {
            error!("Server error: {e}");
        }
    });

    Ok((state, handle, port))
}

/// Bind to the first free port in `[start_port, start_port + max_attempts]`,
/// clamped to the valid port range. Returns the listener and the port used.
async fn bind_with_retry(
    host_ip: std::net::IpAddr,
    start_port: u16,
    max_attempts: u16,
) -> anyhow::Result<(TcpListener, u16)> {
    let last_port = start_port.saturating_add(max_attempts);
    let mut port = start_port;
    loop {
        let addr = SocketAddr::from((host_ip, port));
        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok((listener, port)),
            Err(e) => {
                if port >= last_port {
                    return Err(anyhow::anyhow!(
                        "Could not bind to any port between {} and {} (last error: {})",
                        start_port,
                        port,
                        e
                    ));
                }
                debug!("Port {} is taken, trying next port", port);
                port += 1;
            }
        }
    }
}
