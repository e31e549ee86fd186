use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{origin_of, validate_feed_url};

/// Feed list compiled into the binary, used when no config overrides it.
const BUILTIN_FEEDS: &str = include_str!("feeds.toml");

/// One registered feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Short identifier used in log lines
    pub name: String,
    /// URL of the RSS/Atom document
    pub url: String,
    /// Attribution shown next to each article
    pub label: String,
}

/// Errors raised while checking a feed list.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid feed list: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Feed #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("Feed '{name}' has an invalid URL: {reason}")]
    InvalidUrl { name: String, reason: String },
}

#[derive(Deserialize)]
struct FeedList {
    #[serde(default)]
    feeds: Vec<FeedSource>,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            label: label.into(),
        }
    }

    /// Scheme + host of the feed URL, e.g. `https://www.espn.com`.
    pub fn origin(&self) -> String {
        origin_of(&self.url)
    }

    /// Label to attribute articles to, falling back to the feed name.
    pub fn display_label(&self) -> &str {
        let label = self.label.trim();
        if label.is_empty() {
            &self.name
        } else {
            label
        }
    }
}

/// Returns the built-in feed registry in declaration order.
pub fn builtin_sources() -> Vec<FeedSource> {
    match parse_sources(BUILTIN_FEEDS) {
        Ok(sources) => sources,
        Err(e) => {
            // Only reachable if the embedded file is edited into a bad state
            tracing::error!(error = %e, "Built-in feed registry is invalid");
            Vec::new()
        }
    }
}

/// Parses a TOML document holding `[[feeds]]` tables and validates each entry.
pub fn parse_sources(toml_str: &str) -> Result<Vec<FeedSource>, RegistryError> {
    let list: FeedList = toml::from_str(toml_str)?;
    validate_sources(&list.feeds)?;
    Ok(list.feeds)
}

/// Checks that every source has a name and an http(s) URL.
///
/// A blank label is tolerated and falls back to the name at display time.
pub fn validate_sources(sources: &[FeedSource]) -> Result<(), RegistryError> {
    for (index, source) in sources.iter().enumerate() {
        if source.name.trim().is_empty() {
            return Err(RegistryError::EmptyName { index });
        }
        if let Err(e) = validate_feed_url(&source.url) {
            return Err(RegistryError::InvalidUrl {
                name: source.name.clone(),
                reason: e.to_string(),
            });
        }
    }

    let mut seen = std::collections::HashSet::new();
    for source in sources {
        if !seen.insert(source.name.as_str()) {
            tracing::warn!(feed = %source.name, "Duplicate feed name in registry");
        }
    }

    Ok(())
}
