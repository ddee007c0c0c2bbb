//! # CLI Module
//!
//! This module provides the command-line interface layer for tunetwin. Each
//! invocation plays the part of one step of the two-user flow:
//!
//! ```text
//! tunetwin login --token <first user's token>           # step: first → second
//! tunetwin login --second --token <second user's token> # step: second → comparing
//! tunetwin show                                         # redraw the last result
//! tunetwin compare --refresh                            # re-run, keep the stored first user
//! tunetwin logout                                       # forget everything
//! ```
//!
//! ## Command Categories
//!
//! - [`login`] - Stores a bearer token for the first or second user and runs
//!   that user's pass
//! - [`compare`] - Re-runs the pass of the currently active user
//! - [`show`] - Renders the stored profiles and results as tables
//! - [`logout`] - Clears tokens, the stored first user and all results
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (User Interface, progress bar, tables)
//!     ↓
//! Comparison Engine
//!     ↓
//! Spotify Client → Throttler → Web API
//!     ↓
//! Session (file backed key-value store)
//! ```
//!
//! Obtaining a token is left to the user: any token issued for the scopes
//! `user-library-read user-read-private user-top-read user-follow-read`
//! works.

mod compare;
mod login;
mod logout;
mod show;

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    compare::{ComparisonEngine, ProgressSink},
    config::ClientConfig,
    error,
    session::Session,
    spotify::{ReqwestTransport, SpotifyClient},
    store::FileStore,
};

pub use compare::compare;
pub use login::login;
pub use logout::logout;
pub use show::show;

struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressSink for ProgressBarSink {
    fn report(&self, percent: f64) {
        self.bar.set_position(percent.round() as u64);
    }
}

fn session() -> Session {
    Session::new(Arc::new(FileStore::from_env()))
}

/// Builds client and engine on top of the file backed session.
async fn open_engine() -> (Arc<SpotifyClient>, ComparisonEngine, ProgressBar) {
    let client = match SpotifyClient::from_session(
        ClientConfig::from_env(),
        Arc::new(ReqwestTransport::new()),
        session(),
    )
    .await
    {
        Ok(client) => Arc::new(client),
        Err(e) => error!("Failed to read stored session. Err: {}", e),
    };

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.blue}] {pos}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message("Fetching liked songs");

    let sink = Arc::new(ProgressBarSink { bar: bar.clone() });
    let engine = ComparisonEngine::load(Arc::clone(&client), sink).await;

    (client, engine, bar)
}
