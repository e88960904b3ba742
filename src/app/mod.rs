//! Core application logic for Image Fetcher
//!
//! This module contains the HTTP client, the image link extractor, and the
//! concurrent bulk downloader.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use image_fetcher::app::{
//!     fetch_page, parse_url, resolve_links, Cancellation, ClientConfig, DownloaderConfig,
//!     Extractor, HttpDownloader, ImageExtractor,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientConfig::default().build_http_client()?;
//! let page = parse_url("https://example.com/gallery")?;
//!
//! let html = fetch_page(&client, &page).await?;
//! let links = ImageExtractor::new()?.extract_from_text(&html);
//! let urls = resolve_links(&page, &links);
//!
//! let downloader = HttpDownloader::with_client(client, DownloaderConfig::default());
//! let cancel = Cancellation::with_timeout(Duration::from_secs(60));
//! let outcome = downloader.download(&cancel, &urls, "./downloads").await;
//! println!("{} files written", outcome.paths.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod downloader;
pub mod extractor;

// Re-export main public API
pub use client::{fetch_page, parse_url, ClientConfig};
pub use downloader::{
    CancelReason, Cancellation, DownloadOutcome, DownloadReport, DownloaderConfig,
    DownloaderConfigBuilder, HttpDownloader,
};
pub use extractor::{resolve_links, Extractor, ImageExtractor};
