//! Configuration management for ip-conductor
//!
//! Read from `<config dir>/ip-conductor/config.toml` when present, then
//! overridden by environment variables, then by command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::DEFAULT_BOOKMARK_LIMIT;

pub const DEFAULT_LINE_WIDTH: usize = 70;

/// Environment variable holding the wrap width
pub const LINE_WIDTH_ENV: &str = "LINE_WIDTH";
pub const PROVIDER_ENV: &str = "IP_CONDUCTOR_PROVIDER";
pub const BOOKMARK_LIMIT_ENV: &str = "IP_CONDUCTOR_BOOKMARK_LIMIT";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub reader: ReaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// "instapaper" or "sim"
    pub provider: String,
    /// Base URL of the Instapaper API
    pub api_base: String,
    /// Maximum number of bookmarks fetched per request
    pub bookmark_limit: usize,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: "instapaper".to_string(),
            api_base: "https://www.instapaper.com/api/".to_string(),
            bookmark_limit: DEFAULT_BOOKMARK_LIMIT,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderConfig {
    /// Column width used when wrapping article text
    pub line_width: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl Config {
    /// Load configuration from default location or create default
    ///
    /// Environment overrides are applied on top of whatever was loaded.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load a specific file, falling back to defaults if it does not exist
    ///
    /// A zero width or limit in the file is replaced by its default.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        if config.reader.line_width == 0 {
            tracing::warn!(path = %path.display(), "line_width = 0 in config, using {}", DEFAULT_LINE_WIDTH);
            config.reader.line_width = DEFAULT_LINE_WIDTH;
        }
        if config.store.bookmark_limit == 0 {
            tracing::warn!(path = %path.display(), "bookmark_limit = 0 in config, using {}", DEFAULT_BOOKMARK_LIMIT);
            config.store.bookmark_limit = DEFAULT_BOOKMARK_LIMIT;
        }
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ip-conductor")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Save configuration to default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("No configuration directory available")?;
        self.save_to(&path)
    }

    /// Apply environment overrides using `lookup` to read variables
    ///
    /// Unset, non-numeric or zero widths and limits leave the current value in place.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(width) = lookup(LINE_WIDTH_ENV).as_deref().and_then(parse_positive) {
            self.reader.line_width = width;
        }
        if let Some(limit) = lookup(BOOKMARK_LIMIT_ENV).as_deref().and_then(parse_positive) {
            self.store.bookmark_limit = limit;
        }
        if let Some(provider) = lookup(PROVIDER_ENV) {
            let provider = provider.trim();
            if !provider.is_empty() {
                self.store.provider = provider.to_lowercase();
            }
        }
    }
}

fn parse_positive(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Instapaper account and application credentials
#[derive(Clone)]
pub struct InstapaperCredentials {
    pub username: String,
    pub password: String,
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl std::fmt::Debug for InstapaperCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstapaperCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

impl InstapaperCredentials {
    pub const USERNAME_ENV: &'static str = "INSTAPAPER_USERNAME";
    pub const PASSWORD_ENV: &'static str = "INSTAPAPER_PASSWORD";
    pub const CONSUMER_KEY_ENV: &'static str = "INSTAPAPER_CONSUMER_KEY";
    pub const CONSUMER_SECRET_ENV: &'static str = "INSTAPAPER_CONSUMER_SECRET";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials, naming every missing variable in the error
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |key: &'static str| match lookup(key).filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => {
                missing.push(key);
                String::new()
            }
        };

        let credentials = Self {
            username: read(Self::USERNAME_ENV),
            password: read(Self::PASSWORD_ENV),
            consumer_key: read(Self::CONSUMER_KEY_ENV),
            consumer_secret: read(Self::CONSUMER_SECRET_ENV),
        };

        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }
        Ok(credentials)
    }
}
