//! News aggregation for the Mississippi Sports site.
//!
//! Pulls a fixed set of RSS/Atom feeds concurrently, normalizes every item
//! (title, link, date, excerpt, image, provenance), drops duplicate links and
//! returns the list newest first. See [`feed`] for the pipeline and
//! [`config`] for the optional TOML settings.

pub mod config;
pub mod feed;
pub mod util;
