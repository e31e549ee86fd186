use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a feed item has none.
pub const UNTITLED: &str = "Untitled";
/// Link used when a feed item has none.
pub const MISSING_LINK: &str = "#";

/// One normalized article reference produced by the extractor.
///
/// Every field is populated: missing source data degrades to a default
/// instead of failing the item. `image` is the only optional field and stays
/// `None` until the presentation pass substitutes a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Trimmed title, or [`UNTITLED`]
    pub title: String,
    /// Article URL, or [`MISSING_LINK`]; dedup key after normalization
    pub link: String,
    /// Publication date exactly as the feed wrote it
    pub published_raw: Option<String>,
    /// Parsed publication date; the extraction instant when unparseable
    pub published_at: DateTime<Utc>,
    /// Plain-text summary, at most 160 characters
    pub excerpt: String,
    /// Representative image URL, if one was discoverable
    pub image: Option<String>,
    /// Display label of the feed the item came from
    pub source: String,
    /// Scheme + host of that feed's URL
    pub source_origin: String,
}
