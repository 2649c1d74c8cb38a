use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL into its canonical frontier/storage key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not HTTP or HTTPS, or has no host
/// 3. Remove fragment (everything after #)
/// 4. Remove the query string
/// 5. Remove a single trailing slash
///
/// Scheme, host and path are otherwise kept as the URL parser serializes them.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(String)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse the URL
///
/// # Examples
///
/// ```
/// use doc_ripple::url::normalize_url;
///
/// let url = normalize_url("https://docs.example.com/guide/?lang=en#intro").unwrap();
/// assert_eq!(url, "https://docs.example.com/guide");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<String> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    url.set_query(None);

    let mut normalized: String = url.into();
    if normalized.ends_with('/') {
        normalized.pop();
    }

    Ok(normalized)
}
