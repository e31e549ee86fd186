use crate::feed::item::FeedItem;
use crate::feed::parser::extract_items;
use crate::feed::registry::FeedSource;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

/// Default per-feed deadline covering connect, headers and body.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(8000);
/// Default response body cap.
pub const DEFAULT_MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// `Accept` header sent with every feed request.
pub const FEED_ACCEPT: &str =
    "application/rss+xml, application/atom+xml, application/xml, text/xml;q=0.9, */*;q=0.8";

/// Client identifier sent as `User-Agent` unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "sports-feeds/",
    env!("CARGO_PKG_VERSION"),
    " (+https://mississippisportsapp.com)"
);

/// Errors that can occur while retrieving one feed document.
///
/// None of these escape [`fetch_feed`]; they are logged and the feed
/// contributes no items to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request did not finish within the deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Per-request limits applied by the fetcher.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Deadline for the whole request; the request is dropped on expiry
    pub timeout: Duration,
    /// Maximum accepted body size in bytes
    pub max_feed_size: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_feed_size: DEFAULT_MAX_FEED_SIZE,
        }
    }
}

/// Builds the HTTP client shared by all feed fetches.
///
/// # Errors
///
/// Returns an error if the TLS backend fails to initialize or the user agent
/// is not a valid header value.
pub fn build_client(user_agent: &str) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(user_agent).build()
}

/// Fetches one feed and extracts its items.
///
/// Never fails: a timeout, transport error, non-2xx status or oversized body
/// is logged with the feed's name and yields an empty `Vec`.
///
/// # Arguments
///
/// * `client` - HTTP client (see [`build_client`])
/// * `source` - The feed to fetch
/// * `options` - Timeout and size limit for this request
pub async fn fetch_feed(
    client: &reqwest::Client,
    source: &FeedSource,
    options: &FetchOptions,
) -> Vec<FeedItem> {
    match try_fetch_feed(client, source, options).await {
        Ok(items) => items,
        Err(e) => {
            log_fetch_failure(source, &e);
            Vec::new()
        }
    }
}

/// Like [`fetch_feed`], but hands the failure back instead of logging it.
///
/// A document that answers 2xx but holds no items is `Ok(vec![])`.
pub async fn try_fetch_feed(
    client: &reqwest::Client,
    source: &FeedSource,
    options: &FetchOptions,
) -> Result<Vec<FeedItem>, FetchError> {
    let bytes = fetch_document(client, source, options).await?;
    Ok(extract_items(&bytes, source))
}

pub(crate) fn log_fetch_failure(source: &FeedSource, error: &FetchError) {
    match error {
        FetchError::HttpStatus(status) => {
            tracing::warn!(
                feed = %source.name,
                url = %source.url,
                status = status,
                "Feed returned non-success status"
            );
        }
        e => {
            tracing::warn!(
                feed = %source.name,
                url = %source.url,
                error = %e,
                "Failed to fetch feed"
            );
        }
    }
}

/// Retrieves the raw feed document.
///
/// The deadline wraps the whole exchange, so a server that sends headers
/// promptly and then stalls the body still times out. Dropping the inner
/// future on expiry cancels the request.
///
/// # Errors
///
/// - [`FetchError::Timeout`] - deadline exceeded
/// - [`FetchError::Network`] - connection, TLS or body read failure
/// - [`FetchError::HttpStatus`] - non-2xx response
/// - [`FetchError::ResponseTooLarge`] - body exceeded `options.max_feed_size`
/// - [`FetchError::IncompleteResponse`] - body shorter than Content-Length
pub async fn fetch_document(
    client: &reqwest::Client,
    source: &FeedSource,
    options: &FetchOptions,
) -> Result<Vec<u8>, FetchError> {
    let bytes = tokio::time::timeout(
        options.timeout,
        request_document(client, &source.url, options.max_feed_size),
    )
    .await
    .map_err(|_| FetchError::Timeout(options.timeout))??;

    tracing::debug!(feed = %source.name, bytes = bytes.len(), "Fetched feed document");
    Ok(bytes)
}

async fn request_document(
    client: &reqwest::Client,
    url: &str,
    max_feed_size: usize,
) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url.trim())
        .header(reqwest::header::ACCEPT, FEED_ACCEPT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    read_limited_bytes(response, max_feed_size).await
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Capture Content-Length for completeness check
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
