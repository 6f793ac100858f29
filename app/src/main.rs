use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tl_agent::BankingAgent;
use tl_config::AppConfig;
use tl_guardrails::{default_blocked_patterns, GuardrailRegistry, SanitizationCheck};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teller=info,tl_server=info,tl_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Teller...");

    let config = tl_config::load_config().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    // Register guardrails. Registration must finish before the server
    // starts accepting requests; the registry is read-only afterwards.
    let mut registry = GuardrailRegistry::new();
    if config.guardrails.enabled {
        let mut patterns = default_blocked_patterns();
        patterns.extend(config.guardrails.extra_blocked_patterns.iter().cloned());
        let check =
            SanitizationCheck::new(&patterns, config.guardrails.rejection_message.as_deref())
                .map_err(|e| anyhow::anyhow!("Invalid guardrail pattern: {e}"))?;
        registry.register(Box::new(check));
    } else {
        warn!("Guardrails are disabled by configuration");
    }
    info!("Guardrail registry holds {} check(s)", registry.len());

    let agent = Arc::new(BankingAgent::new(config.agent.initial_balance));

    let (_state, handle, port) =
        tl_server::start_server(config.server, Arc::new(registry), agent).await?;
    info!("Teller agent ready on port {}", port);

    handle.await?;
    Ok(())
}
