//! Application configuration
//!
//! Loaded from `~/.atelier/config.toml`. Every field has a default, so a
//! missing file or a partial one is fine. The Gemini API key is read from the
//! environment and overrides anything in the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants;
use crate::paths;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtelierConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub gemini: GeminiConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. `127.0.0.1:3000`
    pub bind: String,
    /// Number of request-handling threads
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: constants::server::DEFAULT_BIND.to_string(),
            workers: 4,
        }
    }
}

/// Lead storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file; defaults to `~/.atelier/atelier.db`
    pub database_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(paths::database_path)
    }
}

/// Generative API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Base URL up to and including the API version segment
    pub base_url: String,
    pub image_model: String,
    pub text_model: String,
    pub timeout_secs: u64,
    /// Never written back to disk; normally supplied via `GEMINI_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: constants::ai::DEFAULT_BASE_URL.to_string(),
            image_model: constants::ai::IMAGE_MODEL.to_string(),
            text_model: constants::ai::TEXT_MODEL.to_string(),
            timeout_secs: constants::http::REQUEST_TIMEOUT.as_secs(),
            api_key: None,
        }
    }
}

impl GeminiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key, treating an empty string as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl AtelierConfig {
    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file())
    }

    /// Load from `path` (missing file means defaults), then apply environment
    /// overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            info!("Loading config from {}", path.display());
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Self::parse(&text).with_context(|| format!("parsing {}", path.display()))?
        } else {
            debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse TOML text
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(constants::ai::API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = Some(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AtelierConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.gemini.image_model, "gemini-3-pro-image-preview");
        assert_eq!(config.gemini.text_model, "gemini-2.0-flash");
        assert!(config.gemini.api_key().is_none());
    }

    #[test]
    fn test_partial_file() {
        let config = AtelierConfig::parse(
            r#"
            [server]
            bind = "0.0.0.0:8080"

            [gemini]
            timeout_secs = 90
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.workers, 4);
        assert_eq!(config.gemini.timeout(), Duration::from_secs(90));
        assert_eq!(config.gemini.base_url, constants::ai::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_env_overrides_file_key() {
        let mut config =
            AtelierConfig::parse("[gemini]\napi_key = \"from-file\"\n").expect("valid toml");
        config.apply_env(|key| (key == "GEMINI_API_KEY").then(|| "from-env".to_string()));
        assert_eq!(config.gemini.api_key(), Some("from-env"));

        let mut config =
            AtelierConfig::parse("[gemini]\napi_key = \"from-file\"\n").expect("valid toml");
        config.apply_env(|_| Some("   ".to_string()));
        assert_eq!(config.gemini.api_key(), Some("from-file"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = TempDir::new().expect("temp dir");
        let config = AtelierConfig::load_from(&temp.path().join("absent.toml")).expect("load");
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[server\nbind = 3").expect("write");
        assert!(AtelierConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let mut config = AtelierConfig::default();
        config.gemini.api_key = Some("secret".to_string());
        let text = toml::to_string(&config).expect("serialize");
        assert!(!text.contains("secret"));
    }
}
