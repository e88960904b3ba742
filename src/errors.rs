//! Error types for Image Fetcher
//!
//! Each concern (bulk downloads, page fetching, link extraction, configuration)
//! has its own error enum. Per-URL download failures are always tagged with the
//! URL that caused them so callers can tell which entry of a batch went wrong.

use std::path::PathBuf;

use thiserror::Error;

use crate::app::downloader::CancelReason;

/// Failure of a single URL inside a bulk download
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed
    #[error("invalid URL: {reason}")]
    InvalidUrl { reason: String },

    /// Request construction or transport failure
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with anything other than 200 OK
    #[error("unexpected status code {status}")]
    Status { status: u16 },

    /// Local file could not be created
    #[error("failed to create file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Response body could not be written to the local file
    #[error("failed to save file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The transfer was aborted because the batch was cancelled or timed out
    #[error("transfer interrupted: {0}")]
    Interrupted(CancelReason),
}

/// Bulk download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Destination directory could not be created; nothing was fetched
    #[error("error creating download directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single URL failed to download
    #[error("failed to download {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// The batch was cancelled by the caller
    #[error("download cancelled")]
    Cancelled,

    /// The batch deadline elapsed
    #[error("download deadline exceeded")]
    DeadlineExceeded,
}

impl DownloadError {
    /// The URL that caused this error, if it is a per-URL failure
    pub fn url(&self) -> Option<&str> {
        match self {
            DownloadError::Fetch { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Whether the error came from the cancellation signal rather than a URL
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            DownloadError::Cancelled | DownloadError::DeadlineExceeded
        )
    }
}

impl From<CancelReason> for DownloadError {
    fn from(reason: CancelReason) -> Self {
        match reason {
            CancelReason::Cancelled => DownloadError::Cancelled,
            CancelReason::DeadlineExceeded => DownloadError::DeadlineExceeded,
        }
    }
}

/// HTTP client construction and page fetching errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Client could not be built or the request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned a non-success status
    #[error("Server error: HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Image link extraction errors
#[derive(Error, Debug)]
pub enum ExtractError {
    /// HTML file could not be read
    #[error("failed to read HTML file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extraction pattern failed to compile
    #[error("invalid extraction pattern")]
    Pattern(#[from] regex::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Bulk download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// HTTP client error
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Extraction error
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Download(_) => "download",
            AppError::Client(_) => "client",
            AppError::Extract(_) => "extract",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Per-URL fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Client result type alias
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Extraction result type alias
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
