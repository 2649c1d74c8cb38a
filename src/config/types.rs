use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Doc-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from (depth 0)
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Stop once this many pages have been visited
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum BFS distance from the start URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// URL prefixes a link must start with to be enqueued.
    /// Empty means the start URL itself is the only prefix.
    #[serde(rename = "allowed-prefixes", default)]
    pub allowed_prefixes: Vec<String>,

    /// Pause after every page (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Budget for a single render (milliseconds)
    #[serde(rename = "page-load-timeout")]
    pub page_load_timeout: u64,

    /// Minimum time between checkpoint saves (seconds)
    #[serde(rename = "checkpoint-interval")]
    pub checkpoint_interval: u64,

    /// Rewrite every page regardless of stored fingerprints
    #[serde(rename = "force-recrawl", default)]
    pub force_recrawl: bool,

    /// Compare content hashes against stored fingerprints
    #[serde(rename = "change-detection", default = "default_true")]
    pub change_detection: bool,

    /// Follow links found on pages whose content did not change
    #[serde(rename = "expand-unchanged", default)]
    pub expand_unchanged: bool,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay)
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout)
    }

    pub fn checkpoint_interval(&self) -> Duration {
        Duration::from_secs(self.checkpoint_interval)
    }

    /// Returns the allow-list, falling back to the start URL
    pub fn effective_prefixes(&self) -> Vec<String> {
        if self.allowed_prefixes.is_empty() {
            vec![self.start_url.clone()]
        } else {
            self.allowed_prefixes.clone()
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for converted artifacts
    #[serde(rename = "output-directory")]
    pub output_directory: String,

    /// Path to the JSON metadata file
    #[serde(rename = "metadata-path")]
    pub metadata_path: String,

    /// File extension for artifacts
    #[serde(rename = "artifact-extension", default = "default_extension")]
    pub artifact_extension: String,
}

impl OutputConfig {
    pub fn output_directory(&self) -> PathBuf {
        PathBuf::from(&self.output_directory)
    }

    pub fn metadata_path(&self) -> PathBuf {
        PathBuf::from(&self.metadata_path)
    }
}

/// Pre-hash content stabilization
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HashingConfig {
    /// Regular expressions whose matches are removed before hashing
    #[serde(rename = "volatile-patterns", default)]
    pub volatile_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_extension() -> String {
    "md".to_string()
}
