//! Shared fixtures for the integration tests

use async_trait::async_trait;
use doc_ripple::config::{Config, CrawlerConfig, HashingConfig, OutputConfig, UserAgentConfig};
use doc_ripple::crawler::PageRenderer;
use doc_ripple::storage::{
    DocumentStore, MetadataDocument, MetadataStore, StorageError, StorageResult,
};
use doc_ripple::HarvestError;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

pub const ROOT: &str = "https://docs.example.com/documentation";

/// Absolute URL below the documentation root
pub fn doc(path: &str) -> String {
    if path.is_empty() {
        ROOT.to_string()
    } else {
        format!("{}/{}", ROOT, path)
    }
}

/// An HTML page linking to `links`
pub fn page(title: &str, links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<li><a href="{}">{}</a></li>"#, l, l))
        .collect();
    format!(
        "<html><head><title>{title}</title></head><body><h1>{title}</h1><ul>{anchors}</ul></body></html>"
    )
}

pub fn test_config(dir: &Path, max_pages: usize, max_depth: u32) -> Config {
    let output = dir.join("docs");
    Config {
        crawler: CrawlerConfig {
            start_url: ROOT.to_string(),
            max_pages,
            max_depth,
            allowed_prefixes: vec![ROOT.to_string()],
            request_delay: 0,
            page_load_timeout: 2000,
            checkpoint_interval: 0,
            force_recrawl: false,
            change_detection: true,
            expand_unchanged: false,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            output_directory: output.display().to_string(),
            metadata_path: output.join(".crawl-metadata.json").display().to_string(),
            artifact_extension: "md".to_string(),
        },
        hashing: HashingConfig::default(),
    }
}

/// Deterministic in-memory site
///
/// Unknown URLs and URLs marked with `fail_on` return a render error; URLs
/// marked with `hang_on` never complete until cancelled.
#[derive(Clone, Default)]
pub struct SiteRenderer {
    pages: Arc<HashMap<String, String>>,
    failing: Arc<HashSet<String>>,
    hanging: Arc<HashSet<String>>,
    calls: Arc<Mutex<Vec<String>>>,
    cancelled: Arc<AtomicUsize>,
}

impl SiteRenderer {
    pub fn new(pages: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            pages: Arc::new(pages.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn fail_on(mut self, url: &str) -> Self {
        let mut failing = (*self.failing).clone();
        failing.insert(url.to_string());
        self.failing = Arc::new(failing);
        self
    }

    pub fn hang_on(mut self, url: &str) -> Self {
        let mut hanging = (*self.hanging).clone();
        hanging.insert(url.to_string());
        self.hanging = Arc::new(hanging);
        self
    }

    /// URLs rendered so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Renders that observed their cancellation token firing
    pub fn cancellations(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRenderer for SiteRenderer {
    async fn render(&self, url: &str, cancel: CancellationToken) -> Result<String, HarvestError> {
        self.calls.lock().unwrap().push(url.to_string());

        if self.hanging.contains(url) {
            let cancelled = self.cancelled.clone();
            tokio::spawn(async move {
                cancel.cancelled().await;
                cancelled.fetch_add(1, Ordering::SeqCst);
            });
            return std::future::pending().await;
        }

        if self.failing.contains(url) {
            return Err(HarvestError::Render {
                url: url.to_string(),
                message: "renderer crashed".to_string(),
            });
        }

        self.pages.get(url).cloned().ok_or_else(|| HarvestError::Render {
            url: url.to_string(),
            message: "404".to_string(),
        })
    }
}

/// Store whose saves always fail
#[derive(Clone, Default)]
pub struct UnwritableStore {
    pub attempts: Arc<AtomicUsize>,
}

impl DocumentStore for UnwritableStore {
    fn load(&self) -> StorageResult<Option<MetadataDocument>> {
        Ok(None)
    }

    fn save(&self, _document: &MetadataDocument) -> StorageResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Unavailable("read-only target".to_string()))
    }

    fn location(&self) -> String {
        "unwritable".to_string()
    }
}

/// Fingerprints with timestamps dropped and paths made relative
pub fn fingerprint_view(
    store: &MetadataStore,
    output_dir: &Path,
) -> BTreeMap<String, (String, PathBuf, String, u32)> {
    store
        .fingerprints()
        .iter()
        .map(|(url, fp)| {
            let relative = fp
                .storage_path
                .strip_prefix(output_dir)
                .unwrap_or(&fp.storage_path)
                .to_path_buf();
            (
                url.clone(),
                (fp.category.clone(), relative, fp.content_hash.clone(), fp.depth),
            )
        })
        .collect()
}

/// A two-level documentation tree
///
/// ```text
/// root -> swiftui, uikit, foundation
/// swiftui -> swiftui/view, swiftui/text
/// uikit -> uikit/uiview, swiftui/view
/// foundation -> foundation/url
/// ```
pub fn two_level_site() -> Vec<(String, String)> {
    vec![
        (
            doc(""),
            page("Root", &[doc("swiftui"), doc("uikit"), doc("foundation")]),
        ),
        (
            doc("swiftui"),
            page("SwiftUI", &[doc("swiftui/view"), doc("swiftui/text")]),
        ),
        (
            doc("uikit"),
            page("UIKit", &[doc("uikit/uiview"), doc("swiftui/view")]),
        ),
        (doc("foundation"), page("Foundation", &[doc("foundation/url")])),
        (doc("swiftui/view"), page("View", &[doc("")])),
        (doc("swiftui/text"), page("Text", &[])),
        (doc("uikit/uiview"), page("UIView", &[])),
        (doc("foundation/url"), page("URL", &[])),
    ]
}
