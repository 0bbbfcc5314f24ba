//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client (session headers, cookie store)
//! - Fixed pre-request pacing delays
//! - Retry logic with a fixed inter-retry delay and bounded attempts
//! - Error reporting with the attempt count that was spent

use crate::config::HttpConfig;
use crate::{ConfigError, HarvestError};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,

    /// Response body text
    pub body: String,
}

/// Terminal failure of one logical fetch after the retry bound was spent
///
/// Timeouts, connection errors, and non-success HTTP statuses are not told
/// apart; whatever failed the final attempt becomes the reason.
#[derive(Debug, Error)]
#[error("failed after {attempts} attempts: {reason}")]
pub struct FetchFailure {
    /// Description of the last attempt's error
    pub reason: String,

    /// Total attempts made (retries + 1)
    pub attempts: u32,
}

/// Builds the shared HTTP client used by every fetch in the run
///
/// The client carries the configured User-Agent and Referer on every request
/// and keeps one cookie store for the whole process, so all workers share a
/// single session with the target site.
///
/// # Arguments
///
/// * `config` - The HTTP behavior configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(HarvestError)` - Header value or client construction failure
pub fn build_http_client(config: &HttpConfig) -> Result<Client, HarvestError> {
    let mut headers = HeaderMap::new();
    let referer = HeaderValue::from_str(&config.referer).map_err(|e| {
        ConfigError::Validation(format!("referer is not a valid header value: {}", e))
    })?;
    headers.insert(REFERER, referer);

    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Performs paced, retrying fetches against the shared client
///
/// Cheap to share: the underlying `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    request_delay: Duration,
    retry_delay: Duration,
    max_retries: u32,
}

impl Fetcher {
    /// Creates a fetcher from a built client and the HTTP configuration
    pub fn new(client: Client, config: &HttpConfig) -> Self {
        Self {
            client,
            request_delay: Duration::from_millis(config.request_delay_ms),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            max_retries: config.max_retries,
        }
    }

    /// Performs one logical fetch of `url` with bounded retries
    ///
    /// Every attempt, including the first, is preceded by the fixed pacing
    /// delay. A transport error or non-success status fails the attempt; with
    /// attempts remaining the fetcher waits the fixed retry delay and tries
    /// again. Delays are fixed, no jitter, no per-failure-type handling.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - A successful response
    /// * `Err(FetchFailure)` - The retry bound was exhausted
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchFailure> {
        let attempts = self.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            tokio::time::sleep(self.request_delay).await;

            match self.attempt(url).await {
                Ok(page) => return Ok(page),
                Err(reason) => {
                    last_error = reason;
                    if attempt < attempts {
                        tracing::warn!(
                            "Attempt {} failed for {}: {}. Retrying in {:?}...",
                            attempt,
                            url,
                            last_error,
                            self.retry_delay
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        tracing::error!(
            "Failed to fetch {} after {} attempts: {}",
            url,
            attempts,
            last_error
        );
        Err(FetchFailure {
            reason: last_error,
            attempts,
        })
    }

    /// Makes a single request attempt
    async fn attempt(&self, url: &str) -> Result<FetchedPage, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        let body = response.text().await.map_err(|e| e.to_string())?;

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> HttpConfig {
        HttpConfig {
            user_agent: "TestAgent/1.0".to_string(),
            referer: "https://example.com".to_string(),
            request_delay_ms: 0,
            max_retries: 2,
            retry_delay_ms: 0,
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_rejects_bad_referer() {
        let mut config = create_test_config();
        config.referer = "bad\nreferer".to_string();
        assert!(build_http_client(&config).is_err());
    }

    #[test]
    fn test_fetch_failure_display() {
        let failure = FetchFailure {
            reason: "HTTP 500 Internal Server Error".to_string(),
            attempts: 3,
        };
        assert_eq!(
            failure.to_string(),
            "failed after 3 attempts: HTTP 500 Internal Server Error"
        );
    }

    // Retry-count behavior against live responses is covered by the
    // wiremock-based integration tests.
}
