use crate::url::normalize_url;

/// Checks if a normalized URL falls under an allowed prefix
///
/// The prefix must end on a path segment boundary, so
/// `https://example.com/docs` admits `https://example.com/docs` and
/// `https://example.com/docs/view` but not `https://example.com/docs-old`.
///
/// # Examples
///
/// ```
/// use doc_ripple::url::matches_prefix;
///
/// assert!(matches_prefix("https://example.com/docs", "https://example.com/docs/view"));
/// assert!(!matches_prefix("https://example.com/docs", "https://example.com/docs-old/view"));
/// assert!(!matches_prefix("https://example.com/docs", "https://example.com/blog"));
/// ```
pub fn matches_prefix(prefix: &str, candidate: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    match candidate.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

/// Set of URL prefixes a frontier candidate must match
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    prefixes: Vec<String>,
}

impl AllowList {
    /// Builds an allow-list, normalizing each prefix the same way URLs are
    pub fn new(prefixes: &[String]) -> Self {
        let prefixes = prefixes
            .iter()
            .map(|p| normalize_url(p).unwrap_or_else(|_| p.trim_end_matches('/').to_string()))
            .filter(|p| !p.is_empty())
            .collect();
        Self { prefixes }
    }

    /// Returns true if `normalized_url` lies under any allowed prefix
    pub fn allows(&self, normalized_url: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| matches_prefix(prefix, normalized_url))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}
