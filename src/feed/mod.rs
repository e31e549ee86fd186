//! Feed ingestion: registry, fetching, item extraction and aggregation.
//!
//! # Architecture
//!
//! The module is organized into these submodules, leaves first:
//!
//! - [`registry`] - The list of feeds to pull and their display labels
//! - [`parser`] - Streaming RSS/Atom extraction built on `quick-xml`
//! - [`fetcher`] - HTTP retrieval with a per-feed deadline and size cap
//! - [`aggregate`] - Concurrent fan-out, dedup, sort and the default-image pass
//!
//! # Example
//!
//! ```ignore
//! use sports_feeds::feed::{apply_default_images, builtin_sources, build_client, Aggregator};
//!
//! let client = build_client(DEFAULT_USER_AGENT)?;
//! let aggregator = Aggregator::new(client, builtin_sources(), FetchOptions::default());
//! let items = apply_default_images(aggregator.collect().await, DEFAULT_IMAGE);
//! ```

mod aggregate;
mod fetcher;
mod item;
mod parser;
mod registry;

pub use aggregate::{
    apply_default_images, dedupe_by_link, get_all_feed_items, merge_feed_results,
    sort_newest_first, Aggregator, DEFAULT_IMAGE,
};
pub use fetcher::{
    build_client, fetch_document, fetch_feed, try_fetch_feed, FetchError, FetchOptions,
    DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_FEED_SIZE, DEFAULT_USER_AGENT, FEED_ACCEPT,
};
pub use item::{FeedItem, MISSING_LINK, UNTITLED};
pub use parser::{extract_items, extract_items_at, parse_date};
pub use registry::{builtin_sources, parse_sources, validate_sources, FeedSource, RegistryError};
