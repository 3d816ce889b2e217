//! Configuration loading for youtube-transcript-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variable `YOUTUBE_BASE_URL`
//! 2. The file named by `YOUTUBE_TRANSCRIPT_CONFIG`
//! 3. ~/.serp-tools/youtube-transcript.toml
//! 4. Default values

use anyhow::{anyhow, Result};
use search_adapter::DEFAULT_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub youtube: YoutubeConfig,
}

/// How YouTube is reached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// YouTube serves a stripped page to unknown agents
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Language priority list used when a call names none
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

fn default_base_url() -> String {
    "https://www.youtube.com".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36"
        .to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_accept_language() -> String {
    "en-US".to_string()
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            default_language: default_language(),
            accept_language: default_accept_language(),
        }
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

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("YOUTUBE_BASE_URL") {
            self.youtube.base_url = url;
        }
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("YOUTUBE_TRANSCRIPT_CONFIG") {
            return Some(PathBuf::from(path));
        }

        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join(".serp-tools")
                .join("youtube-transcript.toml")
        })
    }
}
