//! On-disk metadata document
//!
//! Everything the crawler persists between runs lives in this one structure
//! and is serialized as a whole.

use crate::output::CrawlStatistics;
use crate::state::{PageFingerprint, SessionCheckpoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The persisted aggregate of fingerprints, statistics and checkpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetadataDocument {
    /// Canonical URL -> fingerprint
    pub fingerprints: BTreeMap<String, PageFingerprint>,

    pub stats: CrawlStatistics,

    /// End of the last completed crawl
    pub last_crawl_at: Option<DateTime<Utc>>,

    /// Present only while a crawl is in flight
    pub checkpoint: Option<SessionCheckpoint>,
}
