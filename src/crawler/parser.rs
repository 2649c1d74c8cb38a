//! Outbound link extraction
//!
//! Links are taken from `<a href>` and `<link rel="canonical">`, resolved
//! against the page URL, and returned in document order without repeats.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Schemes that never lead to another documentation page
const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

/// Finds the URLs a rendered page links to
pub trait LinkExtractor: Send + Sync {
    /// Returns absolute URLs; relative references are resolved against
    /// `base_url`
    fn extract_links(&self, raw: &str, base_url: &str) -> Vec<String>;
}

/// HTML link extractor backed by `scraper`
///
/// **Followed:** `<a href>` (including `rel="nofollow"`) and canonical links.
///
/// **Skipped:** `download` anchors, `javascript:`, `mailto:`, `tel:` and
/// `data:` references, fragment-only anchors, and anything that does not
/// resolve to http(s).
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, raw: &str, base_url: &str) -> Vec<String> {
        match Url::parse(base_url) {
            Ok(base) => extract_links(&Html::parse_document(raw), &base),
            Err(e) => {
                tracing::debug!("Cannot resolve links against {}: {}", base_url, e);
                Vec::new()
            }
        }
    }
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let mut collect = |href: &str| {
        if let Some(absolute) = resolve_link(href, base_url) {
            if seen.insert(absolute.clone()) {
                links.push(absolute);
            }
        }
    };

    if let Ok(anchors) = Selector::parse("a[href]") {
        for element in document.select(&anchors) {
            if element.value().attr("download").is_some() {
                continue;
            }
            if let Some(href) = element.value().attr("href") {
                collect(href);
            }
        }
    }

    if let Ok(canonical) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical) {
            if let Some(href) = element.value().attr("href") {
                collect(href);
            }
        }
    }

    links
}

fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    matches!(absolute.scheme(), "http" | "https").then(|| absolute.to_string())
}
