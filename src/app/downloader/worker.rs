//! Download worker
//!
//! A worker pulls URLs from the shared queue until the queue is closed or the
//! batch is cancelled. Each URL is fetched, streamed to disk and reported on
//! either the result channel or the error channel.

use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};
use url::Url;

use super::cancel::Cancellation;
use super::naming::file_name_for;
use crate::errors::{DownloadError, FetchError, FetchResult};

/// Shared receiving end of the URL queue
pub(super) type UrlQueue = Arc<Mutex<mpsc::Receiver<String>>>;

/// Individual download worker
#[derive(Debug)]
pub(super) struct DownloadWorker {
    /// Worker identifier, used for logging only
    pub(super) id: usize,
    pub(super) client: Client,
    pub(super) dir: Arc<PathBuf>,
    pub(super) cancel: Cancellation,
    pub(super) urls: UrlQueue,
    pub(super) results: mpsc::Sender<PathBuf>,
    pub(super) errors: mpsc::Sender<DownloadError>,
}

impl DownloadWorker {
    /// Worker loop; returns when the queue is drained or the batch is cancelled
    pub(super) async fn run(self) {
        debug!("Worker {} starting", self.id);

        while let Some(url) = self.next_url().await {
            // No new fetch starts once the signal has fired
            if let Some(reason) = self.cancel.reason() {
                debug!("Worker {} stopping before {}: {}", self.id, url, reason);
                break;
            }

            match self.fetch_to_file(&url).await {
                Ok(path) => {
                    debug!("Worker {} saved {} to {}", self.id, url, path.display());
                    if !self.report(&self.results, path).await {
                        break;
                    }
                }
                Err(source) => {
                    warn!("Worker {} failed to download {}: {}", self.id, url, source);
                    let error = DownloadError::Fetch { url, source };
                    if !self.report(&self.errors, error).await {
                        break;
                    }
                }
            }
        }

        debug!("Worker {} exiting", self.id);
    }

    /// Next queued URL, or `None` once the queue is closed or the batch is cancelled
    async fn next_url(&self) -> Option<String> {
        tokio::select! {
            url = async { self.urls.lock().await.recv().await } => url,
            _ = self.cancel.done() => None,
        }
    }

    /// Send `value` unless the batch is cancelled first; `false` if it was dropped
    async fn report<T>(&self, channel: &mpsc::Sender<T>, value: T) -> bool {
        tokio::select! {
            sent = channel.send(value) => sent.is_ok(),
            _ = self.cancel.done() => false,
        }
    }

    /// GET `url` and stream the body into `dir/<file name>`
    ///
    /// The path is only returned after the whole body has been written and
    /// flushed. Both the request and each body read race the cancellation
    /// signal, so an in-flight transfer is abandoned when it fires; the
    /// partially written file is left in place.
    async fn fetch_to_file(&self, url: &str) -> FetchResult<PathBuf> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            reason: e.to_string(),
        })?;

        let response = tokio::select! {
            response = self.client.get(parsed.clone()).send() => response?,
            reason = self.cancel.done() => return Err(FetchError::Interrupted(reason)),
        };

        let status = response.status();
        if status != StatusCode::OK {
            // Dropping the response releases the connection
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let path = self.dir.join(file_name_for(&parsed));
        let mut file = File::create(&path)
            .await
            .map_err(|source| FetchError::CreateFile {
                path: path.clone(),
                source,
            })?;

        let mut body = response.bytes_stream();
        loop {
            let chunk = tokio::select! {
                chunk = body.next() => chunk,
                reason = self.cancel.done() => return Err(FetchError::Interrupted(reason)),
            };

            match chunk {
                Some(chunk) => {
                    file.write_all(&chunk?)
                        .await
                        .map_err(|source| FetchError::Write {
                            path: path.clone(),
                            source,
                        })?;
                }
                None => break,
            }
        }

        file.flush().await.map_err(|source| FetchError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
