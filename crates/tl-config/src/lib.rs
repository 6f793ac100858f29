//! Configuration management
//!
//! Loads TOML configuration from the OS config directory, falling back to
//! defaults when no file exists. Every field has a default, so a partial
//! file only overrides what it names.

pub mod paths;
pub mod types;

use std::path::Path;

use tracing::{debug, info};

use tl_types::{AppError, AppResult};

pub use paths::{config_dir, config_file};
pub use types::{AgentConfig, AppConfig, GuardrailsConfig, ServerConfig};

/// Load configuration from the default location.
///
/// A missing file yields defaults; an unreadable or unparsable file is an
/// error (silently ignoring a broken config hides operator mistakes).
pub fn load_config() -> AppResult<AppConfig> {
    let path = config_file()?;
    load_config_from(&path)
}

/// Load configuration from an explicit path
pub fn load_config_from(path: &Path) -> AppResult<AppConfig> {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let raw = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("Invalid config at {}: {e}", path.display())))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Persist configuration to an explicit path, creating parent directories
pub fn save_config_to(config: &AppConfig, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let raw = toml::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("Failed to serialize config: {e}")))?;
    std::fs::write(path, raw)?;
    Ok(())
}
