//! Global configuration loader for Helios.
//!
//! Reads `config.toml` from the data directory (`~/.helios` in production,
//! overridable via `HELIOS_DATA_DIR`) and falls back to defaults when the
//! file is missing or malformed. The provider API key never lives in the
//! config file: it comes from the `GEMINI_API_KEY` environment variable,
//! wrapped in [`SecretString`].

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct HeliosConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Model used for title synthesis calls.
    #[serde(default = "default_title_model")]
    pub title_model: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_title_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for HeliosConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            title_model: default_title_model(),
        }
    }
}

/// Resolve the data directory: `HELIOS_DATA_DIR`, else `~/.helios`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var("HELIOS_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".helios")
        }
    }
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: returns defaults.
/// - Unreadable or malformed file: logs a warning and returns defaults.
pub async fn load_config(data_dir: &Path) -> HeliosConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return HeliosConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return HeliosConfig::default();
        }
    };

    match toml::from_str::<HeliosConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            HeliosConfig::default()
        }
    }
}

/// Read the provider API key from the environment.
pub fn provider_api_key() -> anyhow::Result<SecretString> {
    match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(SecretString::from(key)),
        _ => anyhow::bail!(
            "GEMINI_API_KEY environment variable not set; the server cannot reach the provider"
        ),
    }
}
