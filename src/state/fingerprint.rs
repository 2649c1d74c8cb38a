use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stored summary of a previously crawled page
///
/// Keyed by canonical URL in the metadata store. Entries are overwritten on
/// recrawl and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFingerprint {
    /// Canonical URL
    pub url: String,

    /// Grouping label derived from the URL path
    pub category: String,

    /// Where the converted artifact was written
    pub storage_path: PathBuf,

    /// Hex SHA-256 of the (normalized) rendered text
    pub content_hash: String,

    /// BFS distance from the start URL
    pub depth: u32,

    pub last_crawled_at: DateTime<Utc>,
}
