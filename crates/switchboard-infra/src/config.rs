//! Configuration loader for Switchboard.
//!
//! Reads `switchboard.toml` and deserializes it into [`SwitchboardConfig`].
//! Falls back to defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use switchboard_types::config::SwitchboardConfig;

/// File name looked up in the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "switchboard.toml";

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "SWITCHBOARD_CONFIG";

/// Pick the config path: explicit flag, then `SWITCHBOARD_CONFIG`, then
/// `./switchboard.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// Load configuration from `path`.
///
/// - Missing file: [`SwitchboardConfig::default()`].
/// - Unreadable or unparseable file: warning, then the default.
pub async fn load_config(path: &Path) -> SwitchboardConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return SwitchboardConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return SwitchboardConfig::default();
        }
    };

    match toml::from_str::<SwitchboardConfig>(&content) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            SwitchboardConfig::default()
        }
    }
}
