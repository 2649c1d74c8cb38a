//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier fresh or from a saved checkpoint
//! - Driving each page through render, hash, change check and persistence
//! - Growing the frontier from extracted links
//! - Rate limiting, checkpointing and progress reporting
//! - Producing the final statistics

use crate::config::{validate, Config};
use crate::crawler::change::ChangeDetector;
use crate::crawler::checkpoint::CheckpointManager;
use crate::crawler::digest::{content_hash, normalizer_for, ContentNormalizer};
use crate::crawler::fetcher::{render_with_timeout, HttpRenderer, PageRenderer, RenderOutcome};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::output::{ContentConverter, CrawlStatistics, MarkdownConverter, PageOutcome};
use crate::state::{PageFingerprint, PageState, PageTracker, QueuedUrl};
use crate::storage::{atomic_write, DocumentStore, MetadataStore};
use crate::url::{normalize_url, AllowList, CategoryResolver};
use crate::{ConfigError, HarvestError};
use chrono::Utc;
use std::path::PathBuf;

/// Snapshot handed to the progress callback after every processed page
#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub current_url: String,
    pub visited_count: usize,
    pub total_pages: u64,
    pub stats: CrawlStatistics,
}

/// Observer invoked after each page; its return value is ignored
pub type ProgressCallback = Box<dyn Fn(&ProgressReport) + Send + Sync>;

/// How a dequeued page left the pipeline
enum Disposition {
    /// Already visited; not counted and not throttled
    Discarded,
    Counted(PageOutcome),
}

/// Builder for [`Coordinator`]
///
/// Every collaborator has a default: HTTP rendering, markdown conversion,
/// HTML link extraction, hashing per `[hashing]`, and the JSON metadata
/// file at `output.metadata-path`.
pub struct CoordinatorBuilder {
    config: Config,
    renderer: Option<Box<dyn PageRenderer>>,
    converter: Option<Box<dyn ContentConverter>>,
    link_extractor: Option<Box<dyn LinkExtractor>>,
    normalizer: Option<Box<dyn ContentNormalizer>>,
    document_store: Option<Box<dyn DocumentStore>>,
    on_progress: Option<ProgressCallback>,
    fresh: bool,
}

impl CoordinatorBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            renderer: None,
            converter: None,
            link_extractor: None,
            normalizer: None,
            document_store: None,
            on_progress: None,
            fresh: false,
        }
    }

    pub fn renderer(mut self, renderer: impl PageRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn converter(mut self, converter: impl ContentConverter + 'static) -> Self {
        self.converter = Some(Box::new(converter));
        self
    }

    pub fn link_extractor(mut self, extractor: impl LinkExtractor + 'static) -> Self {
        self.link_extractor = Some(Box::new(extractor));
        self
    }

    pub fn normalizer(mut self, normalizer: impl ContentNormalizer + 'static) -> Self {
        self.normalizer = Some(Box::new(normalizer));
        self
    }

    /// Replaces the metadata file with another backend
    pub fn document_store(mut self, store: impl DocumentStore + 'static) -> Self {
        self.document_store = Some(Box::new(store));
        self
    }

    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ProgressReport) + Send + Sync + 'static,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Discards any saved checkpoint instead of resuming it
    pub fn fresh(mut self, fresh: bool) -> Self {
        self.fresh = fresh;
        self
    }

    /// Validates the configuration, prepares the output directory and
    /// seeds the frontier
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - Invalid configuration or unusable output directory
    pub fn build(self) -> Result<Coordinator, HarvestError> {
        let config = self.config;
        validate(&config)?;

        let output_dir = config.output.output_directory();
        std::fs::create_dir_all(&output_dir).map_err(|source| HarvestError::Setup {
            path: output_dir.display().to_string(),
            source,
        })?;

        let renderer = match self.renderer {
            Some(renderer) => renderer,
            None => Box::new(HttpRenderer::new(&config.user_agent)?),
        };
        let normalizer = match self.normalizer {
            Some(normalizer) => normalizer,
            None => normalizer_for(&config.hashing)?,
        };
        let converter: Box<dyn ContentConverter> = match self.converter {
            Some(converter) => converter,
            None => Box::new(MarkdownConverter),
        };
        let link_extractor: Box<dyn LinkExtractor> = match self.link_extractor {
            Some(extractor) => extractor,
            None => Box::new(HtmlLinkExtractor),
        };

        let mut store = match self.document_store {
            Some(backend) => MetadataStore::load(backend),
            None => MetadataStore::open(&config.output.metadata_path()),
        };

        let start_url = normalize_url(&config.crawler.start_url)?;
        let mut frontier = Frontier::new(
            AllowList::new(&config.crawler.effective_prefixes()),
            config.crawler.max_depth,
            config.crawler.max_pages,
        );

        if self.fresh && store.checkpoint().is_some() {
            tracing::info!("Discarding saved checkpoint (--fresh)");
            store.clear_checkpoint();
        }

        let resumable = store
            .checkpoint()
            .filter(|checkpoint| checkpoint.resumes(&start_url))
            .cloned();

        let session_started_at = match resumable {
            Some(checkpoint) => {
                tracing::info!(
                    "Resuming crawl started at {}: {} visited, {} pending",
                    checkpoint.session_started_at,
                    checkpoint.visited.len(),
                    checkpoint.pending_queue.len()
                );
                frontier.restore(&checkpoint.visited, &checkpoint.pending_queue);
                if store.stats().started_at.is_none() {
                    store.update_stats(|s| s.started_at = Some(checkpoint.session_started_at));
                }
                checkpoint.session_started_at
            }
            None => {
                if let Some(stale) = store.checkpoint() {
                    tracing::warn!(
                        "Ignoring checkpoint for {} (configured start URL is {})",
                        stale.start_url,
                        start_url
                    );
                    store.clear_checkpoint();
                }
                let now = Utc::now();
                store.reset_stats(CrawlStatistics::started(now));
                frontier.seed(&start_url).map_err(|rejection| {
                    ConfigError::Validation(format!(
                        "start URL {} cannot be queued: {:?}",
                        start_url, rejection
                    ))
                })?;
                now
            }
        };

        let checkpoints = CheckpointManager::new(
            config.crawler.checkpoint_interval(),
            start_url,
            output_dir.display().to_string(),
            session_started_at,
        );

        Ok(Coordinator {
            detector: ChangeDetector::from_config(&config.crawler),
            resolver: CategoryResolver::from_config(&config.crawler),
            config,
            output_dir,
            renderer,
            converter,
            link_extractor,
            normalizer,
            store,
            frontier,
            checkpoints,
            on_progress: self.on_progress,
            started: false,
        })
    }
}

/// Main crawler coordinator structure
///
/// Owns the frontier and metadata store exclusively; pages are processed
/// one at a time.
pub struct Coordinator {
    config: Config,
    output_dir: PathBuf,
    renderer: Box<dyn PageRenderer>,
    converter: Box<dyn ContentConverter>,
    link_extractor: Box<dyn LinkExtractor>,
    normalizer: Box<dyn ContentNormalizer>,
    store: MetadataStore,
    frontier: Frontier,
    checkpoints: CheckpointManager,
    detector: ChangeDetector,
    resolver: CategoryResolver,
    on_progress: Option<ProgressCallback>,
    started: bool,
}

impl Coordinator {
    pub fn builder(config: Config) -> CoordinatorBuilder {
        CoordinatorBuilder::new(config)
    }

    /// Creates a coordinator with the default collaborators
    pub fn new(config: Config, fresh: bool) -> Result<Self, HarvestError> {
        Self::builder(config).fresh(fresh).build()
    }

    pub fn stats(&self) -> &CrawlStatistics {
        self.store.stats()
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Runs the main crawl loop until the frontier is exhausted
    ///
    /// Page failures and checkpoint failures are absorbed by the loop, so
    /// this always ends with statistics.
    pub async fn run(&mut self) -> CrawlStatistics {
        tracing::info!(
            "Starting crawl of {} (max {} pages, depth {})",
            self.config.crawler.start_url,
            self.config.crawler.max_pages,
            self.config.crawler.max_depth
        );

        while self.step().await.is_some() {}

        if self.frontier.reached_page_limit() {
            tracing::info!("Page limit of {} reached", self.config.crawler.max_pages);
        } else {
            tracing::info!("Frontier is empty, crawl complete");
        }

        self.finish()
    }

    /// Processes the next queued page
    ///
    /// # Returns
    ///
    /// * `Some(state)` - The terminal state the page reached
    /// * `None` - The frontier is exhausted
    pub async fn step(&mut self) -> Option<PageState> {
        if !self.started {
            self.checkpoints.begin(&mut self.store, &self.frontier);
            self.started = true;
        }

        let entry = self.frontier.next()?;
        let mut tracker = PageTracker::new(&entry.url);

        match self.process_page(&entry, &mut tracker).await {
            Ok(Disposition::Discarded) => {
                tracing::debug!("Discarding already visited {}", entry.url);
                return Some(settled(&tracker));
            }
            Ok(Disposition::Counted(outcome)) => {
                self.store.update_stats(|s| s.record(outcome));
            }
            Err(e) => {
                tracing::error!("Error processing {}: {}", entry.url, e);
                close_failed(&mut tracker);
                self.store.update_stats(|s| s.record(PageOutcome::Failed));
            }
        }

        self.report_progress(&entry.url);
        self.checkpoints.maybe_save(&mut self.store, &self.frontier);

        let delay = self.config.crawler.request_delay();
        if !delay.is_zero() && !self.frontier.is_exhausted() {
            tokio::time::sleep(delay).await;
        }

        Some(settled(&tracker))
    }

    async fn process_page(
        &mut self,
        entry: &QueuedUrl,
        tracker: &mut PageTracker,
    ) -> Result<Disposition, HarvestError> {
        // The frontier only hands out canonical keys; normalizing again is
        // not idempotent for paths ending in several slashes.
        let url = entry.url.clone();
        tracker.advance(PageState::Normalized)?;

        if self.frontier.is_visited(&url) {
            tracker.advance(PageState::AlreadySeen)?;
            return Ok(Disposition::Discarded);
        }
        self.frontier.mark_visited(&url);

        tracker.advance(PageState::Rendering)?;
        let timeout = self.config.crawler.page_load_timeout();
        let raw = match render_with_timeout(self.renderer.as_ref(), &url, timeout).await {
            RenderOutcome::Rendered(raw) => raw,
            RenderOutcome::TimedOut => {
                tracker.advance(PageState::TimedOut)?;
                return Err(HarvestError::Timeout {
                    url,
                    timeout_ms: self.config.crawler.page_load_timeout,
                });
            }
            RenderOutcome::Failed(e) => {
                tracker.advance(PageState::Failed)?;
                return Err(e);
            }
        };
        tracker.advance(PageState::Rendered)?;

        let hash = content_hash(self.normalizer.as_ref(), &raw);
        tracker.advance(PageState::Hashed)?;

        let location = self.resolver.resolve(&url);
        let artifact_path = location.path(&self.output_dir, &self.config.output.artifact_extension);

        let reason = self.detector.evaluate(self.store.fingerprints(), &url, &hash, &artifact_path);

        let Some(reason) = reason else {
            tracker.advance(PageState::Unchanged)?;
            tracing::debug!("Unchanged: {}", url);
            if self.config.crawler.expand_unchanged {
                tracker.advance(PageState::LinksExtracted)?;
                self.enqueue_children(&raw, &url, entry.depth);
                tracker.advance(PageState::ChildrenEnqueued)?;
            }
            tracker.advance(PageState::SkippedRecorded)?;
            return Ok(Disposition::Counted(PageOutcome::Skipped));
        };

        tracker.advance(PageState::Changed)?;
        tracing::debug!("Writing {} ({})", url, reason);

        let artifact = self.converter.to_artifact(&raw, &url)?;
        atomic_write(&artifact_path, artifact.as_bytes())?;
        tracker.advance(PageState::Persisted)?;

        let outcome = if self.store.fingerprint(&url).is_some() {
            PageOutcome::Updated
        } else {
            PageOutcome::Created
        };

        self.store.update_fingerprint(PageFingerprint {
            url: url.clone(),
            category: location.category,
            storage_path: artifact_path,
            content_hash: hash,
            depth: entry.depth,
            last_crawled_at: Utc::now(),
        });

        if self.frontier.accepts_children_of(entry.depth) {
            tracker.advance(PageState::LinksExtracted)?;
            self.enqueue_children(&raw, &url, entry.depth);
            tracker.advance(PageState::ChildrenEnqueued)?;
        }
        tracker.advance(PageState::StatsUpdated)?;

        Ok(Disposition::Counted(outcome))
    }

    fn enqueue_children(&mut self, raw: &str, url: &str, depth: u32) {
        if !self.frontier.accepts_children_of(depth) {
            return;
        }

        let links = self.link_extractor.extract_links(raw, url);
        let mut added = 0usize;
        for link in &links {
            if self.frontier.push(link, depth + 1).is_ok() {
                added += 1;
            }
        }
        tracing::debug!("{}: {} links, {} enqueued", url, links.len(), added);
    }

    fn report_progress(&self, url: &str) {
        let Some(callback) = &self.on_progress else {
            return;
        };
        let stats = self.store.stats().clone();
        callback(&ProgressReport {
            current_url: url.to_string(),
            visited_count: self.frontier.visited_count(),
            total_pages: stats.total_pages,
            stats,
        });
    }

    fn finish(&mut self) -> CrawlStatistics {
        let now = Utc::now();
        self.store.update_stats(|s| s.finished_at = Some(now));
        self.store.set_last_crawl_at(now);
        self.checkpoints.finish(&mut self.store);

        if self.checkpoints.failed_saves() > 0 {
            tracing::warn!(
                "{} metadata saves failed during this crawl",
                self.checkpoints.failed_saves()
            );
        }

        self.store.stats().clone()
    }
}

/// Final state of a page once `step` is done with it
fn settled(tracker: &PageTracker) -> PageState {
    let state = tracker.state();
    debug_assert!(state.is_terminal(), "page left in non-terminal state {:?}", state);
    state
}

/// Moves a page that hit an error to its terminal error state
fn close_failed(tracker: &mut PageTracker) {
    for next in [PageState::Failed, PageState::ErrorRecorded] {
        if tracker.state().can_transition_to(next) {
            if let Err(e) = tracker.advance(next) {
                tracing::trace!("{}", e);
            }
        }
    }
}
