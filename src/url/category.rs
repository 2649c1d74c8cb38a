use crate::config::CrawlerConfig;
use crate::url::{matches_prefix, normalize_url};
use std::path::{Path, PathBuf};
use url::Url;

/// Where a page's artifact lives, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    /// Grouping label derived from the URL path
    pub category: String,

    /// File stem inside the category directory
    pub slug: String,
}

impl ArtifactLocation {
    /// `output_dir/<category>/<slug>.<extension>`
    pub fn path(&self, output_dir: &Path, extension: &str) -> PathBuf {
        output_dir
            .join(&self.category)
            .join(format!("{}.{}", self.slug, extension))
    }
}

/// Derives categories and slugs from URLs
///
/// The category is the first path segment below the longest matching root;
/// the slug is every remaining segment joined with `_`. A URL equal to its
/// root lands in `root/index`.
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    roots: Vec<String>,
}

impl CategoryResolver {
    pub fn new(roots: Vec<String>) -> Self {
        Self { roots }
    }

    /// Uses the allowed prefixes as roots, or the start URL's parent when
    /// no prefixes are configured
    pub fn from_config(config: &CrawlerConfig) -> Self {
        let roots = if config.allowed_prefixes.is_empty() {
            parent_of(&config.start_url).into_iter().collect()
        } else {
            config
                .allowed_prefixes
                .iter()
                .filter_map(|p| normalize_url(p).ok())
                .collect()
        };
        Self::new(roots)
    }

    /// Resolves a normalized URL to its artifact location
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_ripple::url::CategoryResolver;
    ///
    /// let resolver = CategoryResolver::new(vec!["https://example.com/documentation".into()]);
    /// let location = resolver.resolve("https://example.com/documentation/SwiftUI/View/body");
    /// assert_eq!(location.category, "swiftui");
    /// assert_eq!(location.slug, "view_body");
    /// ```
    pub fn resolve(&self, normalized_url: &str) -> ArtifactLocation {
        let root = self
            .roots
            .iter()
            .filter(|root| matches_prefix(root, normalized_url))
            .max_by_key(|root| root.len());

        let remainder = match root {
            Some(root) => normalized_url[root.len()..].to_string(),
            None => Url::parse(normalized_url)
                .map(|u| u.path().to_string())
                .unwrap_or_default(),
        };

        let segments: Vec<String> = remainder
            .split('/')
            .map(sanitize_segment)
            .filter(|s| !s.is_empty())
            .collect();

        match segments.split_first() {
            Some((category, rest)) if !rest.is_empty() => ArtifactLocation {
                category: category.clone(),
                slug: rest.join("_"),
            },
            Some((category, _)) => ArtifactLocation {
                category: category.clone(),
                slug: "index".to_string(),
            },
            None => ArtifactLocation {
                category: "root".to_string(),
                slug: "index".to_string(),
            },
        }
    }
}

fn parent_of(url_str: &str) -> Option<String> {
    let normalized = normalize_url(url_str).ok()?;
    let mut url = Url::parse(&normalized).ok()?;
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().pop();
    }
    normalize_url(url.as_str()).ok()
}

fn sanitize_segment(segment: &str) -> String {
    let lowered: String = segment
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    lowered.trim_matches('-').to_string()
}
