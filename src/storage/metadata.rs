//! In-memory metadata store
//!
//! All mutations apply to an in-memory `MetadataDocument`; nothing reaches
//! the backing `DocumentStore` until `save()` is called.

use crate::output::CrawlStatistics;
use crate::state::{PageFingerprint, SessionCheckpoint};
use crate::storage::json_file::JsonFileStore;
use crate::storage::traits::{DocumentStore, StorageResult};
use crate::storage::MetadataDocument;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;

/// Fingerprints, statistics and checkpoint for one output tree
pub struct MetadataStore {
    backend: Box<dyn DocumentStore>,
    document: MetadataDocument,
}

impl MetadataStore {
    /// Opens the JSON metadata file at `path`
    ///
    /// A missing file yields an empty store. A file that cannot be read or
    /// parsed is logged and also yields an empty store.
    pub fn open(path: &Path) -> Self {
        Self::load(Box::new(JsonFileStore::new(path)))
    }

    /// Loads the document held by `backend`
    pub fn load(backend: Box<dyn DocumentStore>) -> Self {
        let document = match backend.load() {
            Ok(Some(document)) => {
                tracing::debug!(
                    "Loaded metadata from {} ({} fingerprints)",
                    backend.location(),
                    document.fingerprints.len()
                );
                document
            }
            Ok(None) => {
                tracing::debug!("No metadata at {}, starting empty", backend.location());
                MetadataDocument::default()
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable metadata at {}: {}",
                    backend.location(),
                    e
                );
                MetadataDocument::default()
            }
        };

        Self { backend, document }
    }

    /// Writes the whole document to the backend
    pub fn save(&self) -> StorageResult<()> {
        self.backend.save(&self.document)
    }

    pub fn location(&self) -> String {
        self.backend.location()
    }

    pub fn document(&self) -> &MetadataDocument {
        &self.document
    }

    pub fn fingerprint(&self, url: &str) -> Option<&PageFingerprint> {
        self.document.fingerprints.get(url)
    }

    pub fn fingerprints(&self) -> &BTreeMap<String, PageFingerprint> {
        &self.document.fingerprints
    }

    /// Inserts or replaces the fingerprint keyed by its URL
    pub fn update_fingerprint(&mut self, fingerprint: PageFingerprint) {
        self.document
            .fingerprints
            .insert(fingerprint.url.clone(), fingerprint);
    }

    pub fn stats(&self) -> &CrawlStatistics {
        &self.document.stats
    }

    pub fn update_stats<F>(&mut self, update: F)
    where
        F: FnOnce(&mut CrawlStatistics),
    {
        update(&mut self.document.stats);
    }

    pub fn reset_stats(&mut self, stats: CrawlStatistics) {
        self.document.stats = stats;
    }

    pub fn checkpoint(&self) -> Option<&SessionCheckpoint> {
        self.document.checkpoint.as_ref()
    }

    pub fn set_checkpoint(&mut self, checkpoint: SessionCheckpoint) {
        self.document.checkpoint = Some(checkpoint);
    }

    pub fn clear_checkpoint(&mut self) {
        self.document.checkpoint = None;
    }

    pub fn last_crawl_at(&self) -> Option<DateTime<Utc>> {
        self.document.last_crawl_at
    }

    pub fn set_last_crawl_at(&mut self, at: DateTime<Utc>) {
        self.document.last_crawl_at = Some(at);
    }
}
