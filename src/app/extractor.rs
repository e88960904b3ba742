//! Image link extraction from HTML
//!
//! A single regular-expression scan: every run of non-quote characters ending
//! in `.jpg`, `.png`, `.jpeg` or `.gif` counts as an image link. Matches come
//! back in document order and are not deduplicated.

use std::path::Path;

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::constants::extract;
use crate::errors::{ExtractError, ExtractResult};

/// Source of image links
pub trait Extractor {
    /// Extract image links from HTML text
    fn extract_from_text(&self, text: &str) -> Vec<String>;

    /// Read an HTML file and extract image links from it
    fn extract_from_file(&self, path: &Path) -> ExtractResult<Vec<String>> {
        let text = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.extract_from_text(&text))
    }
}

/// Regex-based image link extractor
#[derive(Debug, Clone)]
pub struct ImageExtractor {
    pattern: Regex,
}

impl ImageExtractor {
    /// Create an extractor with the default image pattern
    pub fn new() -> ExtractResult<Self> {
        Self::with_pattern(extract::IMAGE_LINK_PATTERN)
    }

    /// Create an extractor with a custom pattern
    pub fn with_pattern(pattern: &str) -> ExtractResult<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Extractor for ImageExtractor {
    fn extract_from_text(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Resolve extracted links against the page they came from
///
/// Absolute links pass through unchanged. Links that cannot be joined are
/// skipped.
pub fn resolve_links(base: &Url, links: &[String]) -> Vec<String> {
    links
        .iter()
        .filter_map(|link| match base.join(link.trim()) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                debug!("Skipping unresolvable link {:?}: {}", link, e);
                None
            }
        })
        .collect()
}
