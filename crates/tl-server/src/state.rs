//! Shared server state

use std::sync::Arc;

use chrono::{DateTime, Utc};

use tl_agent::BankingAgent;
use tl_gateway::GuardrailGateway;
use tl_guardrails::GuardrailRegistry;

/// Application state shared across all requests.
///
/// The registry is injected here, fully populated, before the server starts
/// accepting connections; nothing registers checks afterwards.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GuardrailGateway<Arc<BankingAgent>>>,
    pub agent: Arc<BankingAgent>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(registry: Arc<GuardrailRegistry>, agent: Arc<BankingAgent>) -> Self {
        Self {
            gateway: Arc::new(GuardrailGateway::new(agent.clone(), registry)),
            agent,
            started_at: Utc::now(),
        }
    }
}
