//! Global configuration loader for Counsel.
//!
//! Reads `config.toml` from the data directory (`~/.counsel/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};

use counsel_types::config::GlobalConfig;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `COUNSEL_DATA_DIR` environment variable
/// 2. `~/.counsel`
/// 3. `.counsel` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COUNSEL_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".counsel");
    }

    PathBuf::from(".counsel")
}

/// Database URL: `COUNSEL_DATABASE_URL` if set, else `counsel.db` inside
/// `data_dir`.
pub fn resolve_database_url(data_dir: &Path) -> String {
    std::env::var("COUNSEL_DATABASE_URL").unwrap_or_else(|_| {
        format!("sqlite://{}?mode=rwc", data_dir.join("counsel.db").display())
    })
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}
