//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the mirror, including:
//! - Building an HTTP client that presents itself like an ordinary browser
//! - GET requests with a per-attempt timeout
//! - Fixed-delay retry on any failure
//! - Error classification for diagnostics

use crate::config::FetchConfig;
use crate::FetchError;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a single attempt failed
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AttemptError::Timeout
        } else if e.is_connect() {
            AttemptError::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            AttemptError::Status(status)
        } else {
            AttemptError::Other(e.to_string())
        }
    }
}

/// Builds an HTTP client with browser-like default headers
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use course_mirror::config::FetchConfig;
/// use course_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    // The mirrored origin serves an invalid certificate chain
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()
}

/// Resilient page fetcher
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx | Return body |
/// | Non-2xx status | Retry after fixed delay |
/// | Timeout | Retry after fixed delay |
/// | Connection / other error | Retry after fixed delay |
/// | Attempts exhausted | `FetchError` with the last error |
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the fetch configuration
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            max_attempts: config.max_retries.max(1),
            retry_delay: config.retry_delay(),
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetches a page body, retrying on any failure
    ///
    /// Never panics or propagates transport errors: the result is either
    /// the page content or a `FetchError` naming the URL and last error.
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match self.attempt(url).await {
                Ok(body) => {
                    tracing::debug!("Fetched {} ({} bytes)", url, body.len());
                    return Ok(body);
                }
                Err(e) => {
                    tracing::warn!(
                        "Error fetching {} (attempt {}/{}): {}",
                        url,
                        attempt,
                        self.max_attempts,
                        e
                    );
                    last_error = e.to_string();

                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        let error = FetchError {
            url: url.to_string(),
            attempts: self.max_attempts,
            last_error,
        };
        tracing::error!("{}", error);
        Err(error)
    }

    async fn attempt(&self, url: &Url) -> Result<String, AttemptError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status));
        }

        Ok(response.text().await?)
    }
}
