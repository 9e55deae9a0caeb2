//! HTTP fetcher implementation
//!
//! One GET per call against the configured origin. Status codes are not
//! interpreted: a 404 or 500 page is returned as a body like any other. Only
//! failing to build, send, or read the request is an error, and nothing is
//! retried.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::ShareError;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Supplies the request and connect deadlines
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues GET requests against a fixed origin
///
/// Cloning is cheap: the underlying client is reference counted and shared by
/// every fan-out task.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    origin: String,
}

impl Fetcher {
    /// Creates a fetcher for `origin` using an already-built client
    pub fn new(client: Client, origin: &str) -> Self {
        Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// Builds the client from configuration and wraps it
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, ShareError> {
        let client = build_http_client(crawler, user_agent)?;
        Ok(Self::new(client, &crawler.origin))
    }

    /// The origin every path is appended to
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Absolute URL for `path`
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// Fetches `path` and returns the full response body
    ///
    /// # Errors
    ///
    /// `ShareError::Transport` when the request cannot be built or sent, the
    /// connection fails, the deadline passes, or the body cannot be read.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, ShareError> {
        let url = self.url_for(path);
        tracing::debug!("GET {}", url);

        let transport = |source: reqwest::Error| ShareError::Transport {
            path: path.to_string(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered {}, keeping body as-is", url, status);
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}
