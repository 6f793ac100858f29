//! OS-specific path resolution for configuration files

use std::path::PathBuf;

use tl_types::{AppError, AppResult};

/// Get the configuration directory
///
/// Priority:
/// 1. Runtime override via `TELLER_ENV` environment variable: `~/.teller-{env}/`
/// 2. Development mode (debug builds): `~/.teller-dev/`
/// 3. Production mode (release builds): `~/.teller/`
pub fn config_dir() -> AppResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))?;

    // Runtime override via environment variable (for testing)
    if let Ok(env_suffix) = std::env::var("TELLER_ENV") {
        return Ok(home.join(format!(".teller-{}", env_suffix)));
    }

    #[cfg(debug_assertions)]
    let dir = home.join(".teller-dev");

    #[cfg(not(debug_assertions))]
    let dir = home.join(".teller");

    Ok(dir)
}

/// Get the configuration file path
pub fn config_file() -> AppResult<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
