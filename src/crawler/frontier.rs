//! Breadth-first crawl frontier
//!
//! This module handles:
//! - FIFO queue of canonical URLs with their BFS depth
//! - Visited and enqueued sets enforcing that no URL is queued twice
//! - Allow-list filtering and depth bounding at push time
//! - Page-count termination

use crate::state::QueuedUrl;
use crate::url::{normalize_url, AllowList};
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Why a candidate URL was not added to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushRejection {
    Unparseable,
    OutsideAllowList,
    TooDeep,
    AlreadyVisited,
    AlreadyQueued,
}

/// BFS frontier over canonical URLs
///
/// Invariant: every URL in the pending queue is present exactly once in
/// `enqueued`, and no URL is in both `enqueued` and `visited`.
#[derive(Debug, Clone)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    enqueued: HashSet<String>,
    visited: HashSet<String>,
    allow_list: AllowList,
    max_depth: u32,
    max_pages: usize,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new(allow_list: AllowList, max_depth: u32, max_pages: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            enqueued: HashSet::new(),
            visited: HashSet::new(),
            allow_list,
            max_depth,
            max_pages,
        }
    }

    /// Seeds a fresh session with the start URL at depth 0
    pub fn seed(&mut self, start_url: &str) -> Result<(), PushRejection> {
        self.push(start_url, 0)
    }

    /// Restores state from a checkpoint
    ///
    /// The visited set and queue order are taken verbatim. Pending entries
    /// that repeat an earlier entry or a visited URL are dropped so the
    /// invariant holds even for checkpoints written by older builds.
    pub fn restore<'a>(
        &mut self,
        visited: impl IntoIterator<Item = &'a String>,
        pending: impl IntoIterator<Item = &'a QueuedUrl>,
    ) {
        self.queue.clear();
        self.enqueued.clear();
        self.visited = visited.into_iter().cloned().collect();

        for entry in pending {
            if self.visited.contains(&entry.url) || !self.enqueued.insert(entry.url.clone()) {
                tracing::debug!("Dropping duplicate checkpoint entry {}", entry.url);
                continue;
            }
            self.queue.push_back(entry.clone());
        }
    }

    /// Offers a candidate URL to the frontier
    ///
    /// The URL is normalized first; the normalized form must pass the
    /// allow-list, be within the depth bound, and be neither visited nor
    /// already queued.
    pub fn push(&mut self, url: &str, depth: u32) -> Result<(), PushRejection> {
        let normalized = normalize_url(url).map_err(|_| PushRejection::Unparseable)?;

        if !self.allow_list.allows(&normalized) {
            return Err(PushRejection::OutsideAllowList);
        }
        if depth > self.max_depth {
            return Err(PushRejection::TooDeep);
        }
        if self.visited.contains(&normalized) {
            return Err(PushRejection::AlreadyVisited);
        }
        if !self.enqueued.insert(normalized.clone()) {
            return Err(PushRejection::AlreadyQueued);
        }

        tracing::trace!("Enqueued {} at depth {}", normalized, depth);
        self.queue.push_back(QueuedUrl::new(normalized, depth));
        Ok(())
    }

    /// Removes and returns the head of the queue
    ///
    /// Returns `None` when the queue is empty or the page bound is reached.
    pub fn next(&mut self) -> Option<QueuedUrl> {
        if self.reached_page_limit() {
            return None;
        }
        let entry = self.queue.pop_front()?;
        self.enqueued.remove(&entry.url);
        Some(entry)
    }

    /// Records a URL as processed
    ///
    /// Returns false if it had already been visited.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.enqueued.remove(url);
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn reached_page_limit(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    /// True when the crawl loop has nothing left to do
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty() || self.reached_page_limit()
    }

    /// Whether children of a page at `depth` may be enqueued
    pub fn accepts_children_of(&self, depth: u32) -> bool {
        depth < self.max_depth
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Copies out the visited set and queue for checkpointing
    pub fn snapshot(&self) -> (BTreeSet<String>, Vec<QueuedUrl>) {
        (
            self.visited.iter().cloned().collect(),
            self.queue.iter().cloned().collect(),
        )
    }
}
