//! Command-line interface components
//!
//! This module contains CLI-specific code for Image Fetcher, including
//! argument parsing, command handlers, and progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Cli, Commands, DownloadArgs, ExtractArgs, GlobalArgs};
pub use commands::{handle_download, handle_extract};
