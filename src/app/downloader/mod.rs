//! Concurrent bulk downloader
//!
//! Downloads a batch of URLs into a directory using a fixed-size pool of
//! workers, and returns every file that was completely written together with
//! the first error encountered.
//!
//! # Module Organization
//!
//! - [`cancel`] - cancellation token with an optional deadline
//! - [`config`] - worker count and timeout configuration
//! - [`naming`] - local file names derived from URLs
//! - `worker` - the per-task fetch loop
//!
//! # Pipeline
//!
//! ```text
//! distributor ──► URL queue ──► N workers ──┬──► result queue ──► collector
//!                                           └──► error queue  ──┘
//! ```
//!
//! All three queues are bounded and sized to the batch. The result queue
//! closes once every worker has exited, which is what ends collection on the
//! normal path. Cancellation ends collection immediately instead; workers that
//! are mid-write at that point may still finish their file in the background.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use image_fetcher::app::downloader::{Cancellation, DownloaderConfig, HttpDownloader};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = HttpDownloader::new(DownloaderConfig::default())?;
//! let cancel = Cancellation::with_timeout(Duration::from_secs(30));
//! let urls = vec!["https://example.com/a.jpg".to_string()];
//!
//! let outcome = downloader.download(&cancel, &urls, "./downloads").await;
//! for path in &outcome.paths {
//!     println!("saved {}", path.display());
//! }
//! if let Some(error) = outcome.error {
//!     eprintln!("{}", error);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::client::ClientConfig;
use crate::errors::{ClientResult, DownloadError, DownloadResult};

pub mod cancel;
pub mod config;
pub mod naming;
mod worker;

pub use cancel::{CancelReason, Cancellation};
pub use config::{DownloaderConfig, DownloaderConfigBuilder};
pub use naming::file_name_for;

use worker::DownloadWorker;

/// Result of a bulk download
///
/// Partial success is normal: `paths` holds every file that was fully written
/// even when `error` is set.
#[derive(Debug, Default)]
pub struct DownloadOutcome {
    /// Written files, in completion order
    pub paths: Vec<PathBuf>,
    /// Directory failure, cancellation, or the first per-URL failure
    pub error: Option<DownloadError>,
}

impl DownloadOutcome {
    fn failed(error: DownloadError) -> Self {
        Self {
            paths: Vec::new(),
            error: Some(error),
        }
    }

    /// True when no error was recorded
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Split into written paths and the error
    pub fn into_parts(self) -> (Vec<PathBuf>, Option<DownloadError>) {
        (self.paths, self.error)
    }

    /// All-or-nothing view; discards partial results on error
    pub fn into_result(self) -> DownloadResult<Vec<PathBuf>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.paths),
        }
    }

    /// Serializable summary for reporting
    pub fn report(&self) -> DownloadReport {
        DownloadReport {
            paths: self.paths.clone(),
            error: self.error.as_ref().map(|e| e.to_string()),
            failed_url: self
                .error
                .as_ref()
                .and_then(|e| e.url())
                .map(str::to_string),
        }
    }
}

/// JSON-friendly summary of a [`DownloadOutcome`]
#[derive(Debug, Clone, Serialize)]
pub struct DownloadReport {
    pub paths: Vec<PathBuf>,
    pub error: Option<String>,
    pub failed_url: Option<String>,
}

/// Bulk downloader over HTTP with a bounded worker pool
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    config: DownloaderConfig,
}

impl HttpDownloader {
    /// Create a downloader with its own client using `config.request_timeout`
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the HTTP client cannot be built
    pub fn new(config: DownloaderConfig) -> ClientResult<Self> {
        let client = ClientConfig {
            request_timeout: config.request_timeout,
            ..Default::default()
        }
        .build_http_client()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a downloader around a caller-supplied client
    ///
    /// The client's own timeout settings apply to every request.
    pub fn with_client(client: Client, config: DownloaderConfig) -> Self {
        if config.effective_worker_count() as i64 != config.worker_count {
            debug!(
                "Requested worker count {} adjusted to {}",
                config.worker_count,
                config.effective_worker_count()
            );
        }
        Self { client, config }
    }

    /// Downloader configuration
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Number of workers each download call spawns
    pub fn worker_count(&self) -> usize {
        self.config.effective_worker_count()
    }

    /// Download every URL into `dir`
    ///
    /// `dir` is created with its parents if missing; if that fails nothing is
    /// fetched. URLs are neither validated nor deduplicated up front, and
    /// URLs that map to the same file name overwrite each other on disk
    /// while each still reports its path.
    ///
    /// Returns when every worker has finished, or as soon as `cancel` fires.
    /// In the latter case the outcome carries the paths collected so far and
    /// [`DownloadError::Cancelled`] or [`DownloadError::DeadlineExceeded`].
    /// Otherwise the error is the first per-URL failure, if any; later
    /// failures are dropped.
    pub async fn download(
        &self,
        cancel: &Cancellation,
        urls: &[String],
        dir: impl AsRef<Path>,
    ) -> DownloadOutcome {
        let dir = dir.as_ref();

        if let Err(source) = create_download_dir(dir).await {
            warn!("Cannot create download directory {}: {}", dir.display(), source);
            return DownloadOutcome::failed(DownloadError::CreateDir {
                path: dir.to_path_buf(),
                source,
            });
        }

        if urls.is_empty() {
            debug!("No URLs to download");
            return DownloadOutcome::default();
        }

        let worker_count = self.worker_count();
        let capacity = urls.len();
        info!(
            "Downloading {} URLs into {} with {} workers",
            urls.len(),
            dir.display(),
            worker_count
        );

        let (url_tx, url_rx) = mpsc::channel::<String>(capacity);
        let (result_tx, result_rx) = mpsc::channel::<PathBuf>(capacity);
        let (error_tx, error_rx) = mpsc::channel::<DownloadError>(capacity);

        let url_queue = Arc::new(Mutex::new(url_rx));
        let dir = Arc::new(dir.to_path_buf());

        let handles: Vec<JoinHandle<()>> = (0..worker_count)
            .map(|id| {
                let worker = DownloadWorker {
                    id,
                    client: self.client.clone(),
                    dir: Arc::clone(&dir),
                    cancel: cancel.clone(),
                    urls: Arc::clone(&url_queue),
                    results: result_tx.clone(),
                    errors: error_tx.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();
        drop(error_tx);

        tokio::spawn(distribute(urls.to_vec(), url_tx, cancel.clone()));
        tokio::spawn(observe_completion(handles, result_tx));

        let outcome = collect(cancel, result_rx, error_rx).await;
        info!(
            "Download finished: {} files written{}",
            outcome.paths.len(),
            outcome
                .error
                .as_ref()
                .map(|e| format!(", error: {}", e))
                .unwrap_or_default()
        );
        outcome
    }
}

/// Create `dir` and its parents with owner rwx, group/other r-x
async fn create_download_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(crate::constants::files::DIR_PERMISSIONS);
    builder.create(dir).await
}

/// Feed the URL queue; stops early and closes the queue on cancellation
async fn distribute(urls: Vec<String>, queue: mpsc::Sender<String>, cancel: Cancellation) {
    let total = urls.len();
    for (index, url) in urls.into_iter().enumerate() {
        tokio::select! {
            sent = queue.send(url) => {
                if sent.is_err() {
                    debug!("URL queue closed after {} of {} URLs", index, total);
                    return;
                }
            }
            reason = cancel.done() => {
                debug!("Stopped queueing after {} of {} URLs: {}", index, total, reason);
                return;
            }
        }
    }
}

/// Wait for every worker, then drop the last result sender so the
/// collector sees the result queue close
async fn observe_completion(handles: Vec<JoinHandle<()>>, results: mpsc::Sender<PathBuf>) {
    for (id, handle) in handles.into_iter().enumerate() {
        if let Err(e) = handle.await {
            warn!("Worker {} terminated abnormally: {}", id, e);
        }
    }
    drop(results);
}

/// Accumulate results until the result queue closes or `cancel` fires
async fn collect(
    cancel: &Cancellation,
    mut results: mpsc::Receiver<PathBuf>,
    mut errors: mpsc::Receiver<DownloadError>,
) -> DownloadOutcome {
    let mut paths = Vec::new();

    loop {
        tokio::select! {
            reason = cancel.done() => {
                return DownloadOutcome {
                    paths,
                    error: Some(reason.into()),
                };
            }
            received = results.recv() => match received {
                Some(path) => paths.push(path),
                None => break,
            },
        }
    }

    // Workers abandon their work when the signal fires, so the queue can
    // close just after cancellation; the signal takes precedence.
    if let Some(reason) = cancel.reason() {
        return DownloadOutcome {
            paths,
            error: Some(reason.into()),
        };
    }

    let error = errors.try_recv().ok();
    let mut discarded = 0usize;
    while errors.try_recv().is_ok() {
        discarded += 1;
    }
    if discarded > 0 {
        debug!("{} further download errors discarded", discarded);
    }

    DownloadOutcome { paths, error }
}
