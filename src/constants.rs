//! Application constants for Image Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("image-fetcher/", env!("CARGO_PKG_VERSION"));

    /// Default per-request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 20;
}

/// Worker pool sizing
pub mod workers {
    /// Worker count used when the configured value is zero or negative
    pub const DEFAULT_WORKER_COUNT: usize = 5;

    /// Hard ceiling on concurrent workers
    pub const MAX_WORKER_COUNT: usize = 20;
}

/// File naming constants
pub mod files {
    /// Prefix of synthesized file names for URLs without a final path segment
    pub const FALLBACK_FILE_PREFIX: &str = "file_";

    /// Default output directory for downloads
    pub const DEFAULT_OUTPUT_DIR: &str = "./downloads";

    /// Permissions for created download directories (Unix only)
    #[cfg(unix)]
    pub const DIR_PERMISSIONS: u32 = 0o755;
}

/// Link extraction constants
pub mod extract {
    /// Pattern matching image references in HTML text
    pub const IMAGE_LINK_PATTERN: &str = r#"([^"]*\.(jpg|png|jpeg|gif))"#;
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "image-fetcher.toml";

    /// Directory name under the user config directory
    pub const CONFIG_DIR_NAME: &str = "image-fetcher";

    /// Configuration file name under the user config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use workers::{DEFAULT_WORKER_COUNT, MAX_WORKER_COUNT};
