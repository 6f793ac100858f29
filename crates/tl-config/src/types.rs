//! Configuration schema

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub guardrails: GuardrailsConfig,
    pub agent: AgentConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8840,
            enable_cors: true,
        }
    }
}

/// Guardrail settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GuardrailsConfig {
    /// Master switch; when off, no checks are registered at all
    pub enabled: bool,
    /// Extra patterns appended to the built-in sanitization set
    pub extra_blocked_patterns: Vec<String>,
    /// Override for the user-facing rejection message
    pub rejection_message: Option<String>,
}

impl Default for GuardrailsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extra_blocked_patterns: Vec::new(),
            rejection_message: None,
        }
    }
}

/// Banking agent settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Mock starting balance
    pub initial_balance: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1000.0,
        }
    }
}
