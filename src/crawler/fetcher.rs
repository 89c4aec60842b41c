//! Rate-limited HTTP fetcher
//!
//! All outbound requests go through a single [`Fetcher`], which enforces a
//! minimum delay between consecutive calls regardless of their outcome. The
//! fetcher reports non-success status codes through the returned outcome
//! instead of raising; retry and escalation policy belong to the caller.

use crate::config::CrawlerConfig;
use crate::ScoutError;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Result of a successful HTTP exchange
///
/// "Successful" here means the request completed; the status code may still
/// be anything the server chose to return.
#[derive(Debug)]
pub struct FetchOutcome {
    /// HTTP status code
    pub status: u16,

    /// Response body
    pub body: String,
}

/// HTTP fetcher enforcing a global minimum inter-request delay
pub struct Fetcher {
    client: Client,
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl Fetcher {
    /// Builds a fetcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, ScoutError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            min_interval: Duration::from_millis(config.request_delay_ms),
            last_request: None,
        })
    }

    /// Performs a GET request after waiting out the inter-request delay
    ///
    /// Network-level failures (connect errors, timeouts) are returned as
    /// [`ScoutError::Http`]; any completed exchange, whatever its status
    /// code, is an `Ok` outcome.
    pub async fn get(&mut self, url: &str) -> Result<FetchOutcome, ScoutError> {
        self.pace().await;

        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScoutError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|source| ScoutError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchOutcome { status, body })
    }

    /// Sleeps until at least `min_interval` has passed since the previous
    /// request, then records this one
    async fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
