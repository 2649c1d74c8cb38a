//! Page rendering
//!
//! This module handles:
//! - The `PageRenderer` seam the orchestrator renders pages through
//! - A default renderer that fetches pages over HTTP
//! - Racing a render against the page-load timeout and cancelling the loser

use crate::config::UserAgentConfig;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Produces the raw text of a page
///
/// Implementations may fail or never finish; callers bound them with
/// `render_with_timeout`. The token is cancelled when the caller gives up,
/// and implementations that spawn work should stop it when that happens.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, cancel: CancellationToken) -> Result<String, HarvestError>;
}

/// Outcome of one render race
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(String),
    TimedOut,
    Failed(HarvestError),
}

/// Races `renderer` against a `timeout` timer
///
/// Whichever finishes first wins. If the timer wins the render's token is
/// cancelled and its future dropped.
pub async fn render_with_timeout(
    renderer: &dyn PageRenderer,
    url: &str,
    timeout: Duration,
) -> RenderOutcome {
    let token = CancellationToken::new();

    tokio::select! {
        result = renderer.render(url, token.child_token()) => match result {
            Ok(text) => RenderOutcome::Rendered(text),
            Err(e) => RenderOutcome::Failed(e),
        },
        _ = tokio::time::sleep(timeout) => {
            token.cancel();
            RenderOutcome::TimedOut
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use doc_ripple::config::UserAgentConfig;
/// use doc_ripple::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "DocRipple".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renders pages by fetching their HTML over HTTP
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(config: &UserAgentConfig) -> Result<Self, HarvestError> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, url: &str) -> Result<String, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Render {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        response.text().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str, cancel: CancellationToken) -> Result<String, HarvestError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(HarvestError::Cancelled { url: url.to_string() }),
            result = self.fetch(url) => result,
        }
    }
}
