//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building the shared HTTP client with the configured user agent and timeout
//! - Scheme fallback for bare targets
//! - The bounded retry loop with exponential backoff
//! - Racing every request, body read and backoff sleep against cancellation
//!
//! The fetcher never returns an error. Every failure ends up as an inactive
//! [`ScrapeResult`].

use crate::config::ScraperConfig;
use crate::crawler::backoff::{RetryPolicy, Sleeper, TokioSleeper};
use crate::crawler::parser::{DocumentExtractor, HtmlExtractor};
use crate::crawler::result::ScrapeResult;
use crate::url::ensure_scheme;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Upper bound on the TCP connect phase
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The "fetch one URL" capability consumed by the worker pool
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches and extracts one target, encoding any failure in the result
    async fn fetch(&self, token: &CancellationToken, url: &str) -> ScrapeResult;
}

/// Outcome of a single request attempt
#[derive(Debug)]
enum AttemptOutcome {
    /// 200 response with its body read
    Fetched { status: u16, body: String },

    /// Transport error, non-200 status or unreadable body
    Failed { reason: String },

    /// The token fired while the attempt was in flight
    Cancelled,
}

/// Builds the HTTP client shared by every worker
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use webpulse::config::ScraperConfig;
/// use webpulse::crawler::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    let timeout = config.request_timeout();

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(CONNECT_TIMEOUT))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches targets with retry and backoff
///
/// Cloning is cheap; the client, extractor and sleeper are shared.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    extractor: Arc<dyn DocumentExtractor>,
    sleeper: Arc<dyn Sleeper>,
}

impl Fetcher {
    /// Creates a fetcher using the HTML extractor and the tokio timer
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        tracing::debug!(
            "Retry policy: {} attempts, at most {:?} of backoff per URL",
            policy.attempts(),
            policy.total_backoff()
        );
        Self {
            client,
            policy,
            extractor: Arc::new(HtmlExtractor),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Builds the client and policy from configuration
    pub fn from_config(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::new(client, RetryPolicy::from_config(config)))
    }

    /// Replaces the document extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replaces the backoff sleeper
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Runs the attempt loop for an already scheme-qualified URL
    async fn fetch_with_retry(&self, token: &CancellationToken, url: String) -> ScrapeResult {
        let mut attempts = 0;

        for attempt_index in 0..self.policy.attempts() {
            if token.is_cancelled() {
                tracing::debug!("Cancelled before attempt {} for {}", attempt_index + 1, url);
                break;
            }

            attempts += 1;
            match self.attempt(token, &url).await {
                AttemptOutcome::Fetched { status, body } => {
                    let page = self.extractor.extract(&body);
                    return ScrapeResult::success(url, status, attempts, page);
                }
                AttemptOutcome::Cancelled => {
                    tracing::debug!("Attempt {} for {} cancelled", attempts, url);
                    break;
                }
                AttemptOutcome::Failed { reason } => {
                    tracing::debug!("Attempt {} for {} failed: {}", attempts, url, reason);
                }
            }

            if !self.policy.has_next(attempt_index) {
                break;
            }

            let delay = self.policy.delay_for(attempt_index);
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!("Backoff for {} interrupted by cancellation", url);
                    break;
                }
                _ = self.sleeper.sleep(delay) => {}
            }
        }

        ScrapeResult::failure(url, attempts)
    }

    /// Issues one GET and reads the body of a 200 response
    ///
    /// The response is dropped on every exit path, which releases the
    /// connection back to the pool.
    async fn attempt(&self, token: &CancellationToken, url: &str) -> AttemptOutcome {
        let response = tokio::select! {
            biased;
            _ = token.cancelled() => return AttemptOutcome::Cancelled,
            result = self.client.get(url).send() => result,
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                return AttemptOutcome::Failed {
                    reason: classify_error(&e),
                }
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return AttemptOutcome::Failed {
                reason: format!("HTTP {}", status.as_u16()),
            };
        }

        let body = tokio::select! {
            biased;
            _ = token.cancelled() => return AttemptOutcome::Cancelled,
            body = response.text() => body,
        };

        match body {
            Ok(body) => AttemptOutcome::Fetched {
                status: status.as_u16(),
                body,
            },
            Err(e) => AttemptOutcome::Failed {
                reason: format!("Failed to read body: {}", classify_error(&e)),
            },
        }
    }
}

#[async_trait]
impl PageFetcher for Fetcher {
    async fn fetch(&self, token: &CancellationToken, url: &str) -> ScrapeResult {
        self.fetch_with_retry(token, ensure_scheme(url)).await
    }
}

/// Short description of a transport error for the debug log
fn classify_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}
