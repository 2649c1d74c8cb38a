//! Doc-Ripple main entry point
//!
//! This is the command-line interface for the Doc-Ripple documentation crawler.

use anyhow::Context;
use clap::Parser;
use doc_ripple::config::{load_config_with_hash, Config};
use doc_ripple::crawler::Coordinator;
use doc_ripple::output::print_statistics;
use doc_ripple::storage::MetadataStore;
use doc_ripple::url::normalize_url;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Doc-Ripple: an incremental documentation crawler
///
/// Doc-Ripple walks a documentation tree breadth-first, writes each page as
/// a markdown artifact, and on later runs only rewrites pages whose content
/// changed. An interrupted crawl resumes from its last checkpoint.
#[derive(Parser, Debug)]
#[command(name = "doc-ripple")]
#[command(version = "1.0.0")]
#[command(about = "An incremental documentation crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discard any saved checkpoint and start from the start URL
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["stats", "fresh"])]
    dry_run: bool,

    /// Show statistics from the metadata file and exit
    #[arg(long, conflicts_with_all = ["dry_run", "fresh"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config);
        Ok(())
    } else {
        handle_crawl(config, cli.fresh).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_ripple=info,warn"),
            1 => EnvFilter::new("doc_ripple=debug,info"),
            2 => EnvFilter::new("doc_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let start = normalize_url(&config.crawler.start_url)?;

    println!("=== Doc-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", start);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Request delay: {}ms", config.crawler.request_delay);
    println!("  Page load timeout: {}ms", config.crawler.page_load_timeout);
    println!(
        "  Checkpoint interval: {}s",
        config.crawler.checkpoint_interval
    );
    println!("  Force recrawl: {}", config.crawler.force_recrawl);
    println!("  Change detection: {}", config.crawler.change_detection);

    println!("\nAllowed Prefixes:");
    for prefix in config.crawler.effective_prefixes() {
        println!("  - {}", prefix);
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Artifacts: {}", config.output.output_directory);
    println!("  Metadata: {}", config.output.metadata_path);

    if !config.hashing.volatile_patterns.is_empty() {
        println!(
            "\nVolatile patterns stripped before hashing: {}",
            config.hashing.volatile_patterns.len()
        );
    }

    let store = MetadataStore::open(&config.output.metadata_path());
    println!("\n✓ Configuration is valid");
    match store.checkpoint() {
        Some(checkpoint) if checkpoint.resumes(&start) => println!(
            "✓ Would resume: {} visited, {} pending",
            checkpoint.visited.len(),
            checkpoint.pending_queue.len()
        ),
        _ => println!("✓ Would start a fresh session at {}", start),
    }
    println!("✓ {} pages already fingerprinted", store.fingerprints().len());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the metadata file
fn handle_stats(config: &Config) {
    println!("Metadata: {}\n", config.output.metadata_path);

    let store = MetadataStore::open(&config.output.metadata_path());
    print_statistics(store.stats());

    println!("\nFingerprinted pages: {}", store.fingerprints().len());
    if let Some(at) = store.last_crawl_at() {
        println!("Last completed crawl: {}", at.to_rfc3339());
    }
    match store.checkpoint() {
        Some(checkpoint) if checkpoint.active => println!(
            "Interrupted crawl: {} visited, {} pending (last saved {})",
            checkpoint.visited.len(),
            checkpoint.pending_queue.len(),
            checkpoint.last_saved_at.to_rfc3339()
        ),
        _ => println!("No crawl in progress"),
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring saved checkpoint)");
    } else {
        tracing::info!("Starting crawl (will resume if a checkpoint exists)");
    }

    let max_pages = config.crawler.max_pages;
    let mut coordinator = Coordinator::builder(config)
        .fresh(fresh)
        .on_progress(move |report| {
            tracing::info!(
                "[{}/{}] {} (errors: {})",
                report.visited_count,
                max_pages,
                report.current_url,
                report.stats.errors
            );
        })
        .build()
        .context("crawl setup failed")?;

    let stats = coordinator.run().await;
    tracing::info!("Crawl completed");
    print_statistics(&stats);

    Ok(())
}
