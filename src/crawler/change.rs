//! Content change detection
//!
//! Decides whether a freshly rendered page must be converted and written,
//! based only on configuration flags, the stored fingerprint table and the
//! presence of the artifact on disk.

use crate::config::CrawlerConfig;
use crate::state::PageFingerprint;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Why a page is being rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecrawlReason {
    Forced,
    DetectionDisabled,
    FirstVisit,
    ContentChanged,
    ArtifactMissing,
}

impl fmt::Display for RecrawlReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecrawlReason::Forced => "force recrawl",
            RecrawlReason::DetectionDisabled => "change detection disabled",
            RecrawlReason::FirstVisit => "first visit",
            RecrawlReason::ContentChanged => "content changed",
            RecrawlReason::ArtifactMissing => "artifact missing",
        };
        f.write_str(s)
    }
}

/// Change detector configured from the crawler flags
#[derive(Debug, Clone, Copy)]
pub struct ChangeDetector {
    force_recrawl: bool,
    enabled: bool,
}

impl ChangeDetector {
    pub fn new(force_recrawl: bool, enabled: bool) -> Self {
        Self {
            force_recrawl,
            enabled,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.force_recrawl, config.change_detection)
    }

    /// Returns the first rule that requires a rewrite, or `None` to skip
    ///
    /// Rules are checked in order: force flag, detection disabled, missing
    /// fingerprint, hash mismatch, missing artifact file.
    pub fn evaluate(
        &self,
        fingerprints: &BTreeMap<String, PageFingerprint>,
        url: &str,
        content_hash: &str,
        artifact_path: &Path,
    ) -> Option<RecrawlReason> {
        if self.force_recrawl {
            return Some(RecrawlReason::Forced);
        }
        if !self.enabled {
            return Some(RecrawlReason::DetectionDisabled);
        }
        let Some(fingerprint) = fingerprints.get(url) else {
            return Some(RecrawlReason::FirstVisit);
        };
        if fingerprint.content_hash != content_hash {
            return Some(RecrawlReason::ContentChanged);
        }
        if !artifact_path.exists() {
            return Some(RecrawlReason::ArtifactMissing);
        }
        None
    }

    pub fn should_recrawl(
        &self,
        fingerprints: &BTreeMap<String, PageFingerprint>,
        url: &str,
        content_hash: &str,
        artifact_path: &Path,
    ) -> bool {
        self.evaluate(fingerprints, url, content_hash, artifact_path).is_some()
    }
}
