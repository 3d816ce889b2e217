//! Configuration loading for serpapi-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variables `SERPAPI_KEY` / `SERP_API_KEY` and `SERPAPI_BASE_URL`
//! 2. The file named by `SERPAPI_MCP_CONFIG`
//! 3. ~/.serp-tools/serpapi.toml
//! 4. Default values
//!
//! The API key has no default: without one the server refuses to start.

use anyhow::{anyhow, Result};
use search_adapter::{Credential, HttpSettings, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables checked for the API key, in order
pub const KEY_VARS: &[&str] = &["SERPAPI_KEY", "SERP_API_KEY"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub serpapi: SerpApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// SerpAPI connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct SerpApiConfig {
    /// API key; usually supplied through the environment instead
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Server behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Check /account.json at startup and refuse to run on failure
    #[serde(default = "default_true")]
    pub validate_key_on_startup: bool,
}

fn default_base_url() -> String {
    "https://serpapi.com".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("serpapi-mcp/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            validate_key_on_startup: default_true(),
        }
    }
}

impl std::fmt::Debug for SerpApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) => Self::from_file(&path)?,
            None => {
                tracing::info!("No config path specified, using defaults");
                Self::default()
            }
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Read `path`, falling back to defaults when it does not exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| anyhow!("invalid config {}: {}", path.display(), e))
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = KEY_VARS.iter().find_map(|name| lookup(name)) {
            self.serpapi.api_key = Some(key);
        }
        if let Some(url) = lookup("SERPAPI_BASE_URL") {
            self.serpapi.base_url = url;
        }
    }

    /// The API key, or a startup error naming where to put it
    pub fn credential(&self) -> Result<Credential> {
        self.serpapi
            .api_key
            .clone()
            .and_then(Credential::new)
            .ok_or_else(|| {
                anyhow!(
                    "SerpAPI key not configured: set {} (or api_key under [serpapi])",
                    KEY_VARS.join(" or ")
                )
            })
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            base_url: self.serpapi.base_url.clone(),
            timeout_seconds: self.serpapi.timeout_seconds,
            user_agent: self.serpapi.user_agent.clone(),
        }
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SERPAPI_MCP_CONFIG") {
            return Some(PathBuf::from(path));
        }

        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".serp-tools").join("serpapi.toml"))
    }
}
