//! Spotify Library Comparison Library
//!
//! This library retrieves the Spotify libraries of two users (liked tracks,
//! top artists and followed artists) and computes what both of them share.
//! It includes a paced request queue, a paginated fetcher for the liked
//! tracks collection, an artist reconciler that merges artist records from
//! three sources, and the comparison engine that drives the two-user flow.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `compare` - Two-user comparison engine and intersection helpers
//! - `config` - Configuration management and environment variables
//! - `error` - Error types shared across the crate
//! - `pagination` - Offset based retrieval of complete collections
//! - `reconcile` - Artist merging across liked songs, top and followed artists
//! - `session` - Fixed-key view over the persistence store
//! - `spotify` - Spotify Web API client implementation
//! - `store` - Key-value persistence backends
//! - `throttle` - Request pacing and parallelism limiting
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tunetwin::{config, cli};
//!
//! #[tokio::main]
//! async fn main() {
//!     if config::load_env().await.is_ok() {
//!         cli::show().await;
//!     }
//! }
//! ```

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod pagination;
pub mod reconcile;
pub mod session;
pub mod spotify;
pub mod store;
pub mod throttle;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching liked songs...");
/// info!("Found {} common songs", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Comparison complete");
/// success!("Stored library of {} songs", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used by the command layer for unrecoverable errors. Library code
/// returns typed errors instead.
///
/// # Example
///
/// ```
/// error!("Failed to open state directory");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Top artists are not available for this account");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
