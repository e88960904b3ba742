//! Image Fetcher Library
//!
//! Extracts image links from web pages and downloads batches of URLs
//! concurrently with a bounded worker pool, cancellation and deadline
//! support, and partial-failure reporting.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
