//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **URL handling**: feed URL validation, origin extraction and the link
//!   normalization used as the dedup key
//! - **Text processing**: HTML-to-text conversion and word-boundary excerpts
//!
//! # Examples
//!
//! ```
//! use sports_feeds::util::{make_excerpt, normalize_link, validate_feed_url};
//!
//! let url = validate_feed_url("https://example.com/feed.xml").unwrap();
//! assert_eq!(url.scheme(), "https");
//!
//! assert_eq!(normalize_link("https://Example.com/story/"), "https://example.com/story");
//! assert_eq!(make_excerpt("<p>Final: 28-14</p>"), "Final: 28-14");
//! ```

mod text;
mod url_validator;

pub use text::{collapse_entities, first_img_src, make_excerpt, strip_html, EXCERPT_MAX_CHARS};
pub use url_validator::{normalize_link, origin_of, validate_feed_url, UrlValidationError};
