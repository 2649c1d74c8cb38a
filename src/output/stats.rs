//! Aggregate crawl statistics
//!
//! This module provides the counters persisted alongside the fingerprints,
//! plus the summary printed at the end of every run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a processed page was counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// First artifact written for this URL
    Created,

    /// Existing artifact rewritten
    Updated,

    /// Content unchanged and artifact present
    Skipped,

    /// Timeout, render, conversion or persistence failure
    Failed,
}

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlStatistics {
    /// Pages taken off the frontier and processed
    pub total_pages: u64,

    pub new_pages: u64,

    pub updated_pages: u64,

    pub skipped_pages: u64,

    pub errors: u64,

    pub started_at: Option<DateTime<Utc>>,

    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStatistics {
    /// Empty counters for a session starting at `now`
    pub fn started(now: DateTime<Utc>) -> Self {
        Self {
            started_at: Some(now),
            ..Self::default()
        }
    }

    /// Counts one processed page
    pub fn record(&mut self, outcome: PageOutcome) {
        self.total_pages += 1;
        match outcome {
            PageOutcome::Created => self.new_pages += 1,
            PageOutcome::Updated => self.updated_pages += 1,
            PageOutcome::Skipped => self.skipped_pages += 1,
            PageOutcome::Failed => self.errors += 1,
        }
    }

    /// Wall-clock span of the session, once it has finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Compares counters, ignoring timestamps
    pub fn same_counts(&self, other: &Self) -> bool {
        self.total_pages == other.total_pages
            && self.new_pages == other.new_pages
            && self.updated_pages == other.updated_pages
            && self.skipped_pages == other.skipped_pages
            && self.errors == other.errors
    }
}

/// Formats the end-of-run summary
pub fn format_summary(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");
    out.push_str(&format!("  Total pages:   {}\n", stats.total_pages));
    out.push_str(&format!("  New:           {}\n", stats.new_pages));
    out.push_str(&format!("  Updated:       {}\n", stats.updated_pages));
    out.push_str(&format!("  Skipped:       {}\n", stats.skipped_pages));
    out.push_str(&format!("  Errors:        {}\n", stats.errors));

    if let Some(started) = stats.started_at {
        out.push_str(&format!("  Started:       {}\n", started.to_rfc3339()));
    }
    if let Some(finished) = stats.finished_at {
        out.push_str(&format!("  Finished:      {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = stats.duration() {
        out.push_str(&format!(
            "  Duration:      {:.1}s\n",
            duration.num_milliseconds() as f64 / 1000.0
        ));
    }

    let success_rate = if stats.total_pages > 0 {
        (stats.total_pages.saturating_sub(stats.errors) as f64 / stats.total_pages as f64) * 100.0
    } else {
        0.0
    };
    out.push_str(&format!("\nSuccess Rate: {:.1}%\n", success_rate));

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_summary(stats));
}
