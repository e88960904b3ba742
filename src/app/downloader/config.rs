//! Bulk downloader configuration
//!
//! Worker counts are accepted as signed integers so that unset, zero and
//! negative values from configuration files or flags can all fall back to the
//! default instead of being rejected.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{http, workers};

/// Configuration for the bulk downloader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Requested number of concurrent workers; see [`effective_worker_count`]
    ///
    /// [`effective_worker_count`]: DownloaderConfig::effective_worker_count
    pub worker_count: i64,
    /// Per-request timeout for clients built by the downloader itself
    pub request_timeout: Duration,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT as i64,
            request_timeout: http::DEFAULT_TIMEOUT,
        }
    }
}

impl DownloaderConfig {
    /// Number of workers actually spawned
    ///
    /// Zero or negative values select the default of 5; anything above the
    /// ceiling of 20 is clamped to 20.
    pub fn effective_worker_count(&self) -> usize {
        if self.worker_count <= 0 {
            workers::DEFAULT_WORKER_COUNT
        } else {
            usize::try_from(self.worker_count)
                .unwrap_or(workers::MAX_WORKER_COUNT)
                .min(workers::MAX_WORKER_COUNT)
        }
    }
}

/// Builder for DownloaderConfig
#[derive(Debug, Default)]
pub struct DownloaderConfigBuilder {
    config: DownloaderConfig,
}

impl DownloaderConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested number of workers
    pub fn worker_count(mut self, count: i64) -> Self {
        self.config.worker_count = count;
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DownloaderConfig {
        self.config
    }
}
