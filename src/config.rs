//! Configuration file parser for ~/.config/sports-feeds/config.toml.
//!
//! Every key is optional and the file itself may be absent. Unknown keys are
//! accepted but logged, since they are usually misspelled settings.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::feed::{
    builtin_sources, validate_sources, FeedSource, FetchOptions, RegistryError,
    DEFAULT_FETCH_TIMEOUT, DEFAULT_IMAGE, DEFAULT_MAX_FEED_SIZE, DEFAULT_USER_AGENT,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A `[[feeds]]` entry failed validation.
    #[error("Invalid feed in config file: {0}")]
    InvalidFeed(#[from] RegistryError),

    /// A numeric setting is out of range.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-feed deadline in milliseconds.
    pub fetch_timeout_ms: u64,

    /// Maximum accepted feed body size in bytes.
    pub max_feed_size: usize,

    /// Image path substituted for articles without one.
    pub default_image: String,

    /// `User-Agent` sent with feed requests.
    pub user_agent: String,

    /// Replacement feed list. `None` keeps the built-in registry; an empty
    /// list means "fetch nothing".
    pub feeds: Option<Vec<FeedSource>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT.as_millis() as u64,
            max_feed_size: DEFAULT_MAX_FEED_SIZE,
            default_image: DEFAULT_IMAGE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            feeds: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "fetch_timeout_ms",
        "max_feed_size",
        "default_image",
        "user_agent",
        "feeds",
    ];

    /// Reads `path` and returns the validated configuration.
    ///
    /// An absent or blank file means "use the built-in feeds and limits".
    /// Files over 1 MB are refused without being read. Syntax errors, zero
    /// limits and bad `[[feeds]]` entries are returned as errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file absent, using built-in feeds");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };
        if size > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                size,
                Self::MAX_FILE_SIZE
            )));
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            // Removed after the metadata call
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            feeds = config.sources().len(),
            timeout_ms = config.fetch_timeout_ms,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        // Raw table pass only to name unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_feed_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_feed_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Some(feeds) = &self.feeds {
            validate_sources(feeds)?;
        }
        Ok(())
    }

    /// Feeds to aggregate: the configured list, or the built-in registry.
    pub fn sources(&self) -> Vec<FeedSource> {
        match &self.feeds {
            Some(feeds) => feeds.clone(),
            None => builtin_sources(),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: self.fetch_timeout(),
            max_feed_size: self.max_feed_size,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
