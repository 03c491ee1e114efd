//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit and transport error handling

use crate::error::NetworkError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (15 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("appmeta/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| NetworkError::ClientError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic
    ///
    /// Failures for which [`NetworkError::is_transient`] holds are retried
    /// with exponential backoff; anything else fails at once.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, NetworkError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            let error = match self.client.get(url).send().await {
                Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                    NetworkError::RateLimitExceeded {
                        url: url.to_string(),
                    }
                }
                Ok(response) if !response.status().is_success() => {
                    NetworkError::http_status(url, response.status().as_u16())
                }
                Ok(response) => return Ok(response),
                Err(e) if e.is_timeout() => NetworkError::timeout(url),
                Err(e) => NetworkError::request_failed(url, e.to_string()),
            };
            if !error.is_transient() {
                return Err(error);
            }

            debug!(url, attempt, "request failed: {}", error);
            last_error = Some(error);

            if attempt < self.max_retries {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| NetworkError::request_failed(url, "unknown error")))
    }
}
