//! Configuration management for tunetwin.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Every value has a default, so a
//! fresh installation works without any configuration at all.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_THROTTLE_WIDTH: usize = 3;
pub const DEFAULT_THROTTLE_DELAY_MS: u64 = 25;
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file is looked up under `tunetwin/.env` in the platform-specific local
/// data directory:
/// - Linux: `~/.local/share/tunetwin/.env`
/// - macOS: `~/Library/Application Support/tunetwin/.env`
/// - Windows: `%LOCALAPPDATA%/tunetwin/.env`
///
/// A missing file is not an error, all settings have defaults.
///
/// # Errors
///
/// Returns an error string if the parent directory cannot be created or an
/// existing `.env` file cannot be parsed.
///
/// # Example
///
/// ```
/// use tunetwin::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunetwin/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the Spotify Web API base URL.
///
/// Reads `SPOTIFY_API_URL`, falling back to `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Returns a bearer token supplied through the environment, if any.
///
/// Used by `tunetwin login` when no `--token` flag is given.
pub fn spotify_access_token() -> Option<String> {
    env::var("SPOTIFY_ACCESS_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
}

/// Maximum number of API requests in flight at once (`TUNETWIN_THROTTLE_WIDTH`).
pub fn throttle_width() -> usize {
    parse_or("TUNETWIN_THROTTLE_WIDTH", DEFAULT_THROTTLE_WIDTH).max(1)
}

/// Minimum pause between two request dispatches (`TUNETWIN_THROTTLE_DELAY_MS`).
pub fn throttle_delay() -> Duration {
    Duration::from_millis(parse_or(
        "TUNETWIN_THROTTLE_DELAY_MS",
        DEFAULT_THROTTLE_DELAY_MS,
    ))
}

/// Page size used for the liked tracks collection (`TUNETWIN_PAGE_SIZE`).
///
/// The Web API accepts at most 50 items per page.
pub fn page_size() -> usize {
    parse_or("TUNETWIN_PAGE_SIZE", DEFAULT_PAGE_SIZE).clamp(1, 50)
}

/// Directory holding the persisted session state.
///
/// Reads `TUNETWIN_DATA_DIR`, falling back to `tunetwin/state` in the local
/// data directory.
pub fn state_dir() -> PathBuf {
    match env::var("TUNETWIN_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => {
            let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("tunetwin/state");
            path
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Settings of one [`crate::spotify::SpotifyClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub throttle_width: usize,
    pub throttle_delay: Duration,
    pub page_size: usize,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: spotify_apiurl(),
            throttle_width: throttle_width(),
            throttle_delay: throttle_delay(),
            page_size: page_size(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            throttle_width: DEFAULT_THROTTLE_WIDTH,
            throttle_delay: Duration::from_millis(DEFAULT_THROTTLE_DELAY_MS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
