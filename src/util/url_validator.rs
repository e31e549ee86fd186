use thiserror::Error;
use url::Url;

/// Errors that can occur during feed URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates a URL string for use as a feed endpoint.
///
/// Feeds are fetched with a plain HTTP(S) GET, so anything other than an
/// `http`/`https` URL with a host is rejected up front rather than failing
/// on every aggregation run.
///
/// # Examples
///
/// ```
/// use sports_feeds::util::validate_feed_url;
///
/// let url = validate_feed_url("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_feed_url("file:///etc/passwd").is_err());
/// assert!(validate_feed_url("not a url").is_err());
/// ```
pub fn validate_feed_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlValidationError::MissingHost),
    }

    Ok(url)
}

/// Returns the scheme + host (+ non-default port) of a URL, e.g.
/// `https://example.com`.
///
/// Returns an empty string when the URL does not parse or has an opaque
/// origin.
pub fn origin_of(url_str: &str) -> String {
    match Url::parse(url_str.trim()) {
        Ok(url) => {
            let origin = url.origin();
            if origin.is_tuple() {
                origin.ascii_serialization()
            } else {
                String::new()
            }
        }
        Err(_) => String::new(),
    }
}

/// Dedup key for an article link: one trailing slash removed, lowercased.
///
/// ```
/// use sports_feeds::util::normalize_link;
///
/// assert_eq!(normalize_link("https://X.com/a/"), "https://x.com/a");
/// assert_eq!(normalize_link("https://x.com/a"), "https://x.com/a");
/// ```
pub fn normalize_link(link: &str) -> String {
    link.strip_suffix('/').unwrap_or(link).to_lowercase()
}
