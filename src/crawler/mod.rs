//! Crawler module for incremental documentation crawling
//!
//! This module contains the core crawling logic, including:
//! - The breadth-first frontier with its dedup invariant
//! - Content hashing and change detection
//! - Session checkpointing for resume after interruption
//! - Page rendering raced against a timeout
//! - Link extraction and overall crawl coordination

mod change;
mod checkpoint;
mod coordinator;
mod digest;
mod fetcher;
mod frontier;
mod parser;

pub use change::{ChangeDetector, RecrawlReason};
pub use checkpoint::CheckpointManager;
pub use coordinator::{Coordinator, CoordinatorBuilder, ProgressCallback, ProgressReport};
pub use digest::{
    content_hash, normalizer_for, ContentNormalizer, PassThrough, VolatilePatternStripper,
};
pub use fetcher::{
    build_http_client, render_with_timeout, HttpRenderer, PageRenderer, RenderOutcome,
};
pub use frontier::{Frontier, PushRejection};
pub use parser::{HtmlLinkExtractor, LinkExtractor};

use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::HarvestError;

/// Runs a complete crawl with the default collaborators
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and prepare the output directory
/// 2. Load the metadata file and resume or seed the frontier
/// 3. Render, hash and persist pages breadth-first
/// 4. Clear the checkpoint and save the final metadata
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `fresh` - Ignore any saved checkpoint
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - The crawl ran to completion
/// * `Err(HarvestError)` - Setup failed before the first page
pub async fn crawl(config: Config, fresh: bool) -> Result<CrawlStatistics, HarvestError> {
    let mut coordinator = Coordinator::new(config, fresh)?;
    Ok(coordinator.run().await)
}
