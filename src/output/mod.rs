//! Output module for artifacts and crawl summaries
//!
//! This module handles:
//! - Converting rendered pages into markdown artifacts
//! - Recording crawl statistics and printing the end-of-run summary

mod markdown;
pub mod stats;
mod traits;

pub use markdown::{format_markdown, MarkdownConverter};
pub use stats::{format_summary, print_statistics, CrawlStatistics, PageOutcome};
pub use traits::{ContentConverter, RawConverter};
