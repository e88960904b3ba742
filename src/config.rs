//! Configuration management for Image Fetcher
//!
//! Settings come from built-in defaults, optionally overridden by a TOML file
//! and then by command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, DownloaderConfig};
use crate::constants::{config as config_constants, files, http, workers};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Bulk download settings
    pub downloader: DownloaderConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly downloader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloaderConfigToml {
    /// Concurrent workers (zero or negative selects the default, capped at 20)
    pub worker_count: i64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Overall deadline for a batch in seconds (None = no deadline)
    pub deadline_secs: Option<u64>,
    /// Directory downloaded files are written to
    pub output_dir: PathBuf,
}

impl Default for DownloaderConfigToml {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT as i64,
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            deadline_secs: None,
            output_dir: PathBuf::from(files::DEFAULT_OUTPUT_DIR),
        }
    }
}

impl DownloaderConfigToml {
    /// Convert to the runtime downloader configuration
    pub fn to_runtime_config(&self) -> DownloaderConfig {
        DownloaderConfig {
            worker_count: self.worker_count,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// HTTP client configuration matching these settings
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..Default::default()
        }
    }

    /// Batch deadline, if configured
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `./image-fetcher.toml` and
    /// then the user config directory are searched; if neither exists the
    /// defaults are used.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        let config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that would make the downloader unusable
    pub fn validate(&self) -> ConfigResult<()> {
        if self.downloader.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "downloader.request_timeout_secs".to_string(),
                value: "0".to_string(),
                reason: "Request timeout must be greater than zero".to_string(),
            });
        }

        if self.downloader.deadline_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "downloader.deadline_secs".to_string(),
                value: "0".to_string(),
                reason: "Omit the deadline instead of setting it to zero".to_string(),
            });
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: "Expected one of trace, debug, info, warn, error".to_string(),
            });
        }

        Ok(())
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(config_constants::LOCAL_CONFIG_FILE)];
        if let Some(user_path) = Self::default_config_path() {
            search_paths.push(user_path);
        }

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(config_constants::CONFIG_DIR_NAME)
                .join(config_constants::CONFIG_FILE_NAME)
        })
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.downloader.worker_count, 5);
        assert_eq!(config.downloader.request_timeout_secs, 10);
        assert!(config.downloader.deadline().is_none());
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_runtime_conversion() {
        let toml_config = DownloaderConfigToml {
            worker_count: 40,
            request_timeout_secs: 3,
            connect_timeout_secs: 1,
            deadline_secs: Some(90),
            ..Default::default()
        };

        let runtime = toml_config.to_runtime_config();
        assert_eq!(runtime.effective_worker_count(), 20);
        assert_eq!(runtime.request_timeout, Duration::from_secs(3));

        let client = toml_config.client_config();
        assert_eq!(client.connect_timeout, Duration::from_secs(1));
        assert_eq!(toml_config.deadline(), Some(Duration::from_secs(90)));
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_config_loading_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let test_config = r#"
[downloader]
worker_count = 12
deadline_secs = 120
output_dir = "/tmp/images"

[logging]
level = "debug"
"#;
        tokio::fs::write(&config_path, test_config).await.unwrap();

        let config = AppConfig::load(Some(config_path)).await.unwrap();

        assert_eq!(config.downloader.worker_count, 12);
        assert_eq!(config.downloader.deadline_secs, Some(120));
        assert_eq!(config.downloader.output_dir, PathBuf::from("/tmp/images"));
        assert_eq!(config.logging.level, "debug");

        // Unspecified values keep their defaults
        assert_eq!(config.downloader.request_timeout_secs, 10);
    }

    #[tokio::test]
    async fn test_config_loading_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        tokio::fs::write(&config_path, "[downloader\nworker_count = ")
            .await
            .unwrap();

        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.downloader.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.downloader.deadline_secs = Some(0);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "chatty".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let content = toml::to_string(&AppConfig::default()).unwrap();
        assert!(content.contains("[downloader]"));
        assert!(content.contains("[logging]"));

        let parsed: AppConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.downloader.worker_count, 5);
    }
}
