//! Command-line argument parsing for Image Fetcher
//!
//! This module defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Image Fetcher - find and download the images on a web page
#[derive(Parser, Debug)]
#[command(
    name = "image_fetcher",
    version,
    about = "Extract image links from web pages and download them concurrently",
    long_about = "Fetches a web page, extracts the image links it references, and downloads them
with a bounded pool of concurrent workers. Partial results are kept when some downloads fail."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the image links found on a page
    Extract(ExtractArgs),

    /// Download images from a page or from a list of URLs
    Download(DownloadArgs),
}

/// Arguments for the extract command
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Page to scan
    #[arg(value_name = "URL", required_unless_present = "file")]
    pub url: Option<String>,

    /// Scan a local HTML file instead of fetching a page
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Print links exactly as they appear instead of resolving them against the page URL
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for the download command
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Page whose images should be downloaded
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Newline-separated list of URLs to download instead of scanning a page
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    pub from_file: Option<PathBuf>,

    /// Output directory (created if missing)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Number of concurrent download workers (1-20; 0 or less selects the default)
    #[arg(short = 'w', long, allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Overall deadline for the batch, in seconds
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print a JSON summary instead of one path per line
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level, falling back to `default` when no flag is given
    pub fn log_level(&self, default: tracing::Level) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            default
        }
    }
}

impl DownloadArgs {
    /// Exactly one URL source must be given
    pub fn validate(&self) -> Result<(), String> {
        match (&self.url, &self.from_file) {
            (None, None) => Err("Specify a page URL or --from-file".to_string()),
            (Some(_), Some(_)) => Err("Cannot specify both a page URL and --from-file".to_string()),
            _ => Ok(()),
        }?;

        if self.timeout == Some(0) {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download_args() -> DownloadArgs {
        DownloadArgs {
            url: Some("https://example.com".to_string()),
            from_file: None,
            out: None,
            workers: None,
            timeout: None,
            json: false,
        }
    }

    #[test]
    fn test_download_args_validation() {
        let mut args = download_args();
        assert!(args.validate().is_ok());

        args.url = None;
        assert!(args.validate().is_err());

        args.from_file = Some(PathBuf::from("urls.txt"));
        assert!(args.validate().is_ok());

        args.url = Some("https://example.com".to_string());
        assert!(args.validate().is_err());

        let mut args = download_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_download_command() {
        let cli = Cli::try_parse_from([
            "image_fetcher",
            "download",
            "https://example.com/gallery",
            "--out",
            "/tmp/images",
            "-w",
            "-3",
            "--timeout",
            "30",
        ])
        .unwrap();

        match cli.command {
            Commands::Download(args) => {
                assert_eq!(args.url.as_deref(), Some("https://example.com/gallery"));
                assert_eq!(args.out, Some(PathBuf::from("/tmp/images")));
                assert_eq!(args.workers, Some(-3));
                assert_eq!(args.timeout, Some(30));
                assert!(!args.json);
            }
            other => panic!("Expected download command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_extract_requires_source() {
        assert!(Cli::try_parse_from(["image_fetcher", "extract"]).is_err());
        assert!(Cli::try_parse_from(["image_fetcher", "extract", "--file", "page.html"]).is_ok());
        assert!(Cli::try_parse_from([
            "image_fetcher",
            "extract",
            "https://example.com",
            "--file",
            "page.html"
        ])
        .is_err());
    }

    #[test]
    fn test_log_level() {
        let mut cli = Cli::try_parse_from(["image_fetcher", "-q", "extract", "--file", "x.html"])
            .unwrap();
        assert_eq!(cli.log_level(tracing::Level::WARN), tracing::Level::ERROR);

        cli.global.quiet = false;
        cli.global.verbose = true;
        assert_eq!(cli.log_level(tracing::Level::WARN), tracing::Level::INFO);

        cli.global.verbose = false;
        assert_eq!(cli.log_level(tracing::Level::WARN), tracing::Level::WARN);
    }
}
