//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by
//! tunetwin. It covers exactly the four endpoints a library comparison needs
//! and nothing more.
//!
//! ## Architecture
//!
//! ```text
//! Comparison Engine
//!          ↓
//! SpotifyClient (profile, liked songs, top artists, followed artists)
//!          ↓
//! PageFetcher (liked songs only)
//!          ↓
//! Throttler (every request)
//!          ↓
//! Transport (reqwest in production, fakes in tests)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Client
//!
//! [`client`] - Token handling and the single request path:
//! - **Bearer Authorization**: Every request carries the active user's token
//! - **Missing Token**: Fails with [`crate::error::SpotifyError::NotAuthenticated`] before
//!   anything is sent
//! - **Expired Session**: A 401 clears every stored credential and fails with
//!   [`crate::error::SpotifyError::SessionExpired`]
//! - **Error Messages**: Non-success answers become [`crate::error::SpotifyError::Api`]
//!   carrying the status and the best message found in the body
//!
//! ### Library
//!
//! [`library`] - Profile and liked tracks:
//! - `GET /me` - Current user profile
//! - `GET /me/tracks` - Liked tracks, fetched page by page
//!
//! ### Artists
//!
//! [`artists`] - Artist sources used for reconciliation:
//! - `GET /me/top/artists` - Top artists over the medium term
//! - `GET /me/following?type=artist` - Followed artists
//!
//! Both artist endpoints depend on optional scopes. A 403 answer degrades to
//! an empty list.
//!
//! ### Transport
//!
//! [`transport`] - The HTTP seam. [`ReqwestTransport`] talks to the real
//! service; tests plug in their own [`Transport`] implementation.
//!
//! ## Error Handling
//!
//! There are no retries. The throttler paces requests so the rate limit is
//! not hit in the first place, and every failure is reported to the caller
//! exactly once.
//!
//! ## Usage Patterns
//!
//! ```rust
//! let session = Session::new(Arc::new(FileStore::from_env()));
//! let client = SpotifyClient::from_session(
//!     ClientConfig::from_env(),
//!     Arc::new(ReqwestTransport::new()),
//!     session,
//! )
//! .await?;
//!
//! let me = client.get_current_user().await?;
//! let songs = client.get_all_liked_songs(|p| println!("{p:.0}%")).await?;
//! ```

pub mod artists;
pub mod client;
pub mod library;
pub mod transport;

pub use artists::DEFAULT_TOP_ARTISTS_LIMIT;
pub use client::{SpotifyClient, error_message};
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
