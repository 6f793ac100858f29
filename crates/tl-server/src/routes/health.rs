//! GET /health liveness endpoint

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "uptime_seconds": (Utc::now() - state.started_at).num_seconds(),
    }))
}
