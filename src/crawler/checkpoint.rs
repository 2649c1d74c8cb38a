//! Session checkpointing
//!
//! This module handles:
//! - Saving the frontier into the metadata store at session start
//! - Periodic saves once the configured interval has elapsed
//! - The final save at clean completion, which clears the checkpoint
//!
//! Save failures are logged and counted here but never returned: losing a
//! checkpoint costs resume progress, not the crawl.

use crate::crawler::frontier::Frontier;
use crate::state::SessionCheckpoint;
use crate::storage::MetadataStore;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Schedules and performs checkpoint saves for one crawl session
#[derive(Debug)]
pub struct CheckpointManager {
    interval: Duration,
    start_url: String,
    output_directory: String,
    session_started_at: DateTime<Utc>,
    last_saved: Option<Instant>,
    failed_saves: u64,
}

impl CheckpointManager {
    pub fn new(
        interval: Duration,
        start_url: impl Into<String>,
        output_directory: impl Into<String>,
        session_started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            interval,
            start_url: start_url.into(),
            output_directory: output_directory.into(),
            session_started_at,
            last_saved: None,
            failed_saves: 0,
        }
    }

    /// Number of saves that failed this session
    pub fn failed_saves(&self) -> u64 {
        self.failed_saves
    }

    /// Builds an active checkpoint from the current frontier
    pub fn snapshot(&self, frontier: &Frontier) -> SessionCheckpoint {
        let (visited, pending_queue) = frontier.snapshot();
        SessionCheckpoint {
            visited,
            pending_queue,
            start_url: self.start_url.clone(),
            output_directory: self.output_directory.clone(),
            session_started_at: self.session_started_at,
            last_saved_at: Utc::now(),
            active: true,
        }
    }

    /// Saves at session start unless the store already holds this session
    pub fn begin(&mut self, store: &mut MetadataStore, frontier: &Frontier) -> bool {
        let resumed = store
            .checkpoint()
            .map(|c| c.resumes(&self.start_url))
            .unwrap_or(false);

        if resumed {
            self.last_saved = Some(Instant::now());
            return true;
        }
        self.save_now(store, frontier)
    }

    /// Whether the interval has elapsed since the last save attempt
    pub fn is_due(&self) -> bool {
        match self.last_saved {
            Some(at) => at.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Saves if the interval has elapsed
    ///
    /// Returns true only if a save was attempted and succeeded.
    pub fn maybe_save(&mut self, store: &mut MetadataStore, frontier: &Frontier) -> bool {
        if !self.is_due() {
            return false;
        }
        self.save_now(store, frontier)
    }

    /// Writes the current frontier and the rest of the metadata document
    pub fn save_now(&mut self, store: &mut MetadataStore, frontier: &Frontier) -> bool {
        store.set_checkpoint(self.snapshot(frontier));
        self.last_saved = Some(Instant::now());
        self.persist(store, "checkpoint")
    }

    /// Clears the checkpoint and writes the final document
    pub fn finish(&mut self, store: &mut MetadataStore) -> bool {
        store.clear_checkpoint();
        self.persist(store, "final metadata")
    }

    fn persist(&mut self, store: &MetadataStore, what: &str) -> bool {
        match store.save() {
            Ok(()) => {
                tracing::debug!("Saved {} to {}", what, store.location());
                true
            }
            Err(e) => {
                self.failed_saves += 1;
                tracing::warn!("Failed to save {} to {}: {}", what, store.location(), e);
                false
            }
        }
    }
}
