//! Application configuration management
//!
//! Configuration is loaded from an optional TOML file and then overlaid with
//! environment variables. The Gemini API key is allowed to be absent at
//! startup; its absence is reported per request rather than aborting.

use crate::core::constants::gemini;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default server port
const DEFAULT_PORT: u16 = 8888;

/// Config file looked up when `CONFIG_PATH` is not set
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds; no timeout when unset
    #[serde(default)]
    pub request_timeout: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    gemini::DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    gemini::DEFAULT_MODEL.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Relay configuration, injected into request handlers through `AppState`
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key; `None` when not configured
    pub gemini_api_key: Option<String>,

    /// Generative Language API base URL
    pub gemini_base_url: String,

    /// Model name used in the `generateContent` path
    pub gemini_model: String,

    /// Optional outbound request timeout in seconds
    pub request_timeout: Option<u64>,

    pub host: String,

    pub port: u16,

    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from(TomlConfig::default())
    }
}

impl From<TomlConfig> for Config {
    fn from(config: TomlConfig) -> Self {
        Config {
            gemini_api_key: config.gemini.api_key,
            gemini_base_url: config.gemini.base_url,
            gemini_model: config.gemini.model,
            request_timeout: config.gemini.request_timeout,
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        Ok(config.into())
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the config file and process environment
    ///
    /// An explicit `CONFIG_PATH` must exist; the default `config.toml` is
    /// optional and defaults are used when it is missing.
    pub fn from_env() -> Result<Self> {
        let base = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(&path)
                .with_context(|| format!("Failed to load CONFIG_PATH={}", path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => Self::default(),
        };

        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// Overlay values from a variable lookup on top of this configuration
    ///
    /// `lookup` is usually `std::env::var`; tests pass a map instead.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
        if let Some(url) = lookup("GEMINI_BASE_URL") {
            self.gemini_base_url = url;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini_model = model;
        }
        if let Some(timeout) = lookup("REQUEST_TIMEOUT") {
            let secs = timeout
                .parse::<u64>()
                .with_context(|| format!("REQUEST_TIMEOUT must be a number of seconds, got {:?}", timeout))?;
            self.request_timeout = Some(secs);
        }
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", port))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(self)
    }

    /// The configured API key, treating blank values as absent
    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [gemini]
            api_key = "AIza-test"
            model = "gemini-1.5-pro"
            request_timeout = 30

            [server]
            host = "127.0.0.1"
            port = 9000
            log_level = "debug"
        "#
        )
        .unwrap();
        file.flush().unwrap();
        file
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_load_config() {
        let file = create_test_config();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.api_key(), Some("AIza-test"));
        assert_eq!(config.gemini_model, "gemini-1.5-pro");
        assert_eq!(config.gemini_base_url, gemini::DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Some(30));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert!(!config.has_api_key());
        assert_eq!(config.gemini_model, gemini::DEFAULT_MODEL);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(Config::from_toml_str("[server]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = create_test_config();
        let config = Config::from_file(file.path())
            .unwrap()
            .with_overrides(lookup_from(&[
                ("GEMINI_API_KEY", "AIza-env"),
                ("PORT", "8080"),
                ("REQUEST_TIMEOUT", "5"),
            ]))
            .unwrap();
        assert_eq!(config.api_key(), Some("AIza-env"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, Some(5));
        assert_eq!(config.gemini_model, "gemini-1.5-pro");
    }

    #[test]
    fn test_invalid_port_override_is_rejected() {
        let result = Config::default().with_overrides(lookup_from(&[("PORT", "not-a-port")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = Config::default()
            .with_overrides(lookup_from(&[("GEMINI_API_KEY", "   ")]))
            .unwrap();
        assert_eq!(config.api_key(), None);
        assert!(!config.has_api_key());
    }
}
