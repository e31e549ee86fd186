use std::collections::HashSet;

use futures::future::join_all;
use tokio::task::JoinError;

use crate::feed::fetcher::{log_fetch_failure, try_fetch_feed, FetchError, FetchOptions};
use crate::feed::item::FeedItem;
use crate::feed::registry::FeedSource;
use crate::util::normalize_link;

/// Placeholder image path used by [`apply_default_images`].
pub const DEFAULT_IMAGE: &str = "/default-article.jpg";

/// Runs the full fetch → extract → merge pipeline over a fixed set of feeds.
///
/// Holds no state between runs: every [`Aggregator::collect`] call is a
/// complete, independent fan-out.
#[derive(Debug, Clone)]
pub struct Aggregator {
    client: reqwest::Client,
    sources: Vec<FeedSource>,
    options: FetchOptions,
}

impl Aggregator {
    pub fn new(client: reqwest::Client, sources: Vec<FeedSource>, options: FetchOptions) -> Self {
        Self {
            client,
            sources,
            options,
        }
    }

    /// Fetches every feed and returns the deduplicated, newest-first list.
    pub async fn collect(&self) -> Vec<FeedItem> {
        get_all_feed_items(&self.client, &self.sources, &self.options).await
    }
}

/// Fetches all feeds concurrently and merges the results.
///
/// One task is spawned per source and every task is awaited before merging.
/// A feed that fails (or whose task panics) contributes nothing; the others
/// are unaffected, so the worst case is an empty list.
///
/// Results are merged in registry order, not completion order: when two
/// feeds carry the same article, the one listed first keeps it.
pub async fn get_all_feed_items(
    client: &reqwest::Client,
    sources: &[FeedSource],
    options: &FetchOptions,
) -> Vec<FeedItem> {
    if sources.is_empty() {
        return Vec::new();
    }

    let handles: Vec<_> = sources
        .iter()
        .cloned()
        .map(|source| {
            let client = client.clone();
            let options = options.clone();
            tokio::spawn(async move { try_fetch_feed(&client, &source, &options).await })
        })
        .collect();

    // join_all yields outcomes in input order
    let outcomes = join_all(handles).await;

    let batches: Vec<Vec<FeedItem>> = sources
        .iter()
        .zip(outcomes)
        .filter_map(|(source, outcome)| settle(source, outcome))
        .collect();

    // Feeds that answered, including those with zero items
    let healthy = batches.len();
    let fetched: usize = batches.iter().map(Vec::len).sum();
    let items = merge_feed_results(batches);

    tracing::info!(
        sources = sources.len(),
        healthy = healthy,
        fetched = fetched,
        unique = items.len(),
        "Aggregated feed items"
    );

    items
}

/// Turns one task outcome into a batch. Failures are logged and yield `None`.
fn settle(
    source: &FeedSource,
    outcome: Result<Result<Vec<FeedItem>, FetchError>, JoinError>,
) -> Option<Vec<FeedItem>> {
    match outcome {
        Ok(Ok(items)) => Some(items),
        Ok(Err(e)) => {
            log_fetch_failure(source, &e);
            None
        }
        Err(e) => {
            tracing::warn!(feed = %source.name, error = %e, "Feed task aborted");
            None
        }
    }
}

/// Concatenates per-feed batches, drops duplicate links and sorts newest first.
pub fn merge_feed_results(batches: Vec<Vec<FeedItem>>) -> Vec<FeedItem> {
    let merged: Vec<FeedItem> = batches.into_iter().flatten().collect();
    let mut unique = dedupe_by_link(merged);
    sort_newest_first(&mut unique);
    unique
}

/// Keeps the first item for each normalized link (see [`normalize_link`]).
pub fn dedupe_by_link(items: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(normalize_link(&item.link)))
        .collect()
}

/// Stable sort by `published_at`, most recent first.
pub fn sort_newest_first(items: &mut [FeedItem]) {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Presentation pass: fills every missing image with `default_image`.
///
/// Kept apart from extraction so ranking and dedup never see placeholder
/// images.
pub fn apply_default_images(items: Vec<FeedItem>, default_image: &str) -> Vec<FeedItem> {
    items
        .into_iter()
        .map(|mut item| {
            if item.image.is_none() {
                item.image = Some(default_image.to_owned());
            }
            item
        })
        .collect()
}
