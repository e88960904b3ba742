//! Command handlers for Image Fetcher CLI
//!
//! This module connects parsed arguments and loaded configuration to the
//! extractor and the bulk downloader.

use std::path::{Path, PathBuf};
use std::time::Instant;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::app::{
    fetch_page, parse_url, resolve_links, Cancellation, Extractor, HttpDownloader,
    ImageExtractor,
};
use crate::cli::progress::spinner;
use crate::cli::{DownloadArgs, ExtractArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the extract command
///
/// Prints every image link found on the page or in the local file, one per line.
pub async fn handle_extract(args: ExtractArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let extractor = ImageExtractor::new()?;

    let links = match (&args.file, &args.url) {
        (Some(file), _) => {
            info!("Scanning local file {}", file.display());
            extractor.extract_from_file(file)?
        }
        (None, Some(url)) => {
            let client = config.downloader.client_config().build_http_client()?;
            collect_page_links(&client, &extractor, url, !args.raw, quiet).await?
        }
        (None, None) => return Err(AppError::generic("Specify a page URL or --file")),
    };

    if links.is_empty() && !quiet {
        eprintln!("No image links found");
    }
    for link in links {
        println!("{}", link);
    }

    Ok(())
}

/// Handle the download command
///
/// Gathers URLs, runs the bulk downloader with Ctrl-C wired to cancellation,
/// prints every written file, and fails if any error was returned.
pub async fn handle_download(args: DownloadArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let client = config.downloader.client_config().build_http_client()?;

    let urls = match (&args.from_file, &args.url) {
        (Some(list), _) => read_url_list(list).await?,
        (None, Some(url)) => {
            let extractor = ImageExtractor::new()?;
            collect_page_links(&client, &extractor, url, true, quiet).await?
        }
        (None, None) => return Err(AppError::generic("Specify a page URL or --from-file")),
    };

    let out_dir: PathBuf = args
        .out
        .clone()
        .unwrap_or_else(|| config.downloader.output_dir.clone());

    let mut downloader_config = config.downloader.to_runtime_config();
    if let Some(workers) = args.workers {
        downloader_config.worker_count = workers;
    }
    let downloader = HttpDownloader::with_client(client, downloader_config);

    let deadline = args
        .timeout
        .map(std::time::Duration::from_secs)
        .or_else(|| config.downloader.deadline());
    let cancel = match deadline {
        Some(deadline) => Cancellation::with_timeout(deadline),
        None => Cancellation::new(),
    };
    spawn_ctrl_c_handler(cancel.clone());

    let start = Instant::now();
    let progress = spinner(
        format!(
            "Downloading {} files with {} workers...",
            urls.len(),
            downloader.worker_count()
        ),
        quiet || args.json,
    );
    let outcome = downloader.download(&cancel, &urls, &out_dir).await;
    progress.finish_and_clear();

    info!(
        "Downloaded {} of {} files in {:?}",
        outcome.paths.len(),
        urls.len(),
        start.elapsed()
    );

    if args.json {
        let report = serde_json::to_string_pretty(&outcome.report())
            .map_err(|e| AppError::generic(format!("Failed to serialize report: {}", e)))?;
        println!("{}", report);
    } else {
        for path in &outcome.paths {
            println!("{}", path.display());
        }
    }

    match outcome.error {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Fetch a page and return its image links, optionally resolved against the page URL
async fn collect_page_links(
    client: &Client,
    extractor: &ImageExtractor,
    url: &str,
    resolve: bool,
    quiet: bool,
) -> Result<Vec<String>> {
    let page_url = parse_url(url)?;

    let progress = spinner(format!("Fetching {}...", page_url), quiet);
    let html = fetch_page(client, &page_url).await;
    progress.finish_and_clear();

    let links = extractor.extract_from_text(&html?);
    info!("Found {} image links on {}", links.len(), page_url);

    if resolve {
        Ok(resolve_links(&page_url, &links))
    } else {
        Ok(links)
    }
}

/// Read a newline-separated URL list; blank lines and `#` comments are skipped
async fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::generic(format!("Failed to read URL list {}: {}", path.display(), e))
    })?;

    let urls = parse_url_list(&content);
    debug!("Read {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}

fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Cancel the batch on Ctrl-C
fn spawn_ctrl_c_handler(cancel: Cancellation) {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    warn!("Interrupt received, cancelling downloads");
                    cancel.cancel();
                }
                Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
            },
            _ = cancel.done() => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_url_list() {
        let content = "http://ok.test/a.jpg\n\n  # comment\n  http://ok.test/b.png  \n";
        assert_eq!(
            parse_url_list(content),
            vec!["http://ok.test/a.jpg", "http://ok.test/b.png"]
        );
    }

    #[tokio::test]
    async fn test_read_missing_url_list() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_url_list(&temp_dir.path().join("missing.txt")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_download_from_page() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gallery/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<img src="one.png"><img src="/img/two.jpg">"#),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gallery/one.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"one".to_vec()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/img/two.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"two".to_vec()))
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let args = DownloadArgs {
            url: Some(format!("{}/gallery/", mock_server.uri())),
            from_file: None,
            out: Some(temp_dir.path().to_path_buf()),
            workers: Some(2),
            timeout: Some(30),
            json: true,
        };

        handle_download(args, &AppConfig::default(), true)
            .await
            .unwrap();

        assert_eq!(
            std::fs::read(temp_dir.path().join("one.png")).unwrap(),
            b"one"
        );
        assert_eq!(
            std::fs::read(temp_dir.path().join("two.jpg")).unwrap(),
            b"two"
        );
    }

    #[tokio::test]
    async fn test_download_from_list_reports_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let list = temp_dir.path().join("urls.txt");
        std::fs::write(&list, format!("{}/missing.jpg\n", mock_server.uri())).unwrap();

        let args = DownloadArgs {
            url: None,
            from_file: Some(list),
            out: Some(temp_dir.path().join("out")),
            workers: None,
            timeout: None,
            json: false,
        };

        let result = handle_download(args, &AppConfig::default(), true).await;
        match result {
            Err(AppError::Download(error)) => {
                assert!(error.url().unwrap().ends_with("/missing.jpg"));
            }
            other => panic!("Expected download error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extract_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let page = temp_dir.path().join("page.html");
        std::fs::write(&page, r#"<img src="a.gif">"#).unwrap();

        let args = ExtractArgs {
            url: None,
            file: Some(page),
            raw: false,
        };

        assert!(handle_extract(args, &AppConfig::default(), true)
            .await
            .is_ok());
    }
}
