//! URL reachability checks
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - A probe trait so checks can run against a fake in tests
//! - Concurrent checking of every URL in a record, bounded by a semaphore

mod client;

pub use client::{HttpClient, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

use crate::config::NetworkConfig;
use crate::domain::{Component, Issue};
use crate::error::NetworkError;
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Something that can tell whether a URL answers
#[async_trait]
pub trait LinkProbe: Send + Sync {
    /// Succeeds when the URL responds with a success status
    async fn probe(&self, url: &str) -> Result<(), NetworkError>;
}

/// Probe that issues a real HTTP GET
pub struct HttpProbe {
    client: HttpClient,
}

impl HttpProbe {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Create a probe from network settings
    pub fn from_config(config: &NetworkConfig) -> Result<Self, NetworkError> {
        let client =
            HttpClient::with_config(Duration::from_secs(config.timeout_secs), DEFAULT_USER_AGENT)?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl LinkProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<(), NetworkError> {
        self.client.get(url).await.map(|_| ())
    }
}

/// Every http(s) URL in a record: `<url>` entries, then screenshot images
///
/// Duplicates are dropped, keeping first-seen order.
pub fn collect_urls(component: &Component) -> Vec<String> {
    let candidates = component
        .urls
        .iter()
        .map(|u| u.value.trim())
        .chain(
            component
                .screenshots
                .iter()
                .flat_map(|s| s.images.iter().map(|i| i.url.trim())),
        );

    let mut urls: Vec<String> = Vec::new();
    for url in candidates {
        let is_http = url.starts_with("https://") || url.starts_with("http://");
        if is_http && !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
    urls
}

/// Runs probes concurrently with a fixed limit
pub struct UrlChecker {
    probe: Arc<dyn LinkProbe>,
    semaphore: Arc<Semaphore>,
}

impl UrlChecker {
    /// Create a checker allowing `concurrency` probes at once
    pub fn new(probe: Arc<dyn LinkProbe>, concurrency: usize) -> Self {
        Self {
            probe,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Probe each URL and return a `url-unreachable` warning per failure
    ///
    /// Issues come back in the order of `urls`.
    pub async fn check(&self, urls: &[String], progress: Option<&ProgressBar>) -> Vec<Issue> {
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            let probe = Arc::clone(&self.probe);
            let semaphore = Arc::clone(&self.semaphore);
            let url = url.clone();
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => probe.probe(&url).await,
                    Err(e) => Err(NetworkError::request_failed(&url, e.to_string())),
                };
                (index, url, result)
            });
        }

        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            if let Some(bar) = progress {
                bar.inc(1);
            }
            match joined {
                Ok((index, url, Ok(()))) => {
                    debug!(index, url = %url, "url reachable");
                }
                Ok((index, url, Err(e))) => {
                    failures.push((index, Issue::warning("url-unreachable", e.to_string())));
                    debug!(url = %url, "url unreachable");
                }
                Err(e) => warn!("url probe task failed: {}", e),
            }
        }

        failures.sort_by_key(|(index, _)| *index);
        failures.into_iter().map(|(_, issue)| issue).collect()
    }
}
