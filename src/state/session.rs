use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedUrl {
    /// Canonical URL
    pub url: String,

    /// BFS distance from the start URL
    pub depth: u32,
}

impl QueuedUrl {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Durable snapshot of an in-flight crawl
///
/// Present in the metadata store only while a crawl is running. A snapshot
/// left with `active == true` after the process exits marks the crawl as
/// resumable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCheckpoint {
    pub visited: BTreeSet<String>,

    /// FIFO order is preserved
    pub pending_queue: Vec<QueuedUrl>,

    pub start_url: String,

    pub output_directory: String,

    pub session_started_at: DateTime<Utc>,

    pub last_saved_at: DateTime<Utc>,

    pub active: bool,
}

impl SessionCheckpoint {
    /// Returns true if this checkpoint can seed a resumed crawl of `start_url`
    pub fn resumes(&self, start_url: &str) -> bool {
        self.active && self.start_url == start_url
    }
}
