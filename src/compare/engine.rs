use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    error::{CompareError, SpotifyError, StoreError},
    reconcile,
    session::Session,
    spotify::{DEFAULT_TOP_ARTISTS_LIMIT, SpotifyClient},
    types::{
        AppState, Artist, ComparisonResult, CurrentUserResponse, Profiles, SavedTrack, Step,
        Track, UserProfile, UserSnapshot,
    },
    utils,
};

use super::{common_artists, common_songs};

const TOP_GENRES: usize = 4;

/// Receives song retrieval progress in percent.
pub trait ProgressSink: Send + Sync {
    fn report(&self, percent: f64);
}

impl<F> ProgressSink for F
where
    F: Fn(f64) + Send + Sync,
{
    fn report(&self, percent: f64) {
        self(percent)
    }
}

/// Drives the two-user flow.
///
/// The engine moves from [`Step::First`] to [`Step::Second`] once the first
/// user's library has been fetched and stored, and to [`Step::Comparing`]
/// once the second user's library has been fetched and compared against it.
/// The state is written to the session after every pass so a later
/// invocation can pick it up again.
pub struct ComparisonEngine {
    client: Arc<SpotifyClient>,
    session: Session,
    progress_sink: Arc<dyn ProgressSink>,
    state: AppState,
    progress: f64,
    error: Option<String>,
}

impl ComparisonEngine {
    /// Creates an engine and restores the previously stored state.
    ///
    /// Unreadable stored state is logged and replaced by an empty one.
    pub async fn load(client: Arc<SpotifyClient>, progress_sink: Arc<dyn ProgressSink>) -> Self {
        let session = client.session().clone();
        let state = session.load_app_state().await.unwrap_or_else(|e| {
            warn!(error = %e, "cannot read stored state, starting fresh");
            AppState::default()
        });

        Self {
            client,
            session,
            progress_sink,
            state,
            progress: 0.0,
            error: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn current_step(&self) -> Step {
        self.state.current_step
    }

    pub fn profiles(&self) -> &Profiles {
        &self.state.profiles
    }

    pub fn result(&self) -> ComparisonResult {
        ComparisonResult {
            common_songs: self.state.common_songs.clone(),
            common_artists: self.state.common_artists.clone(),
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Message of the last failed pass, cleared when a new pass starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches the active user's library and advances the flow.
    ///
    /// For the first user the reconciled library is stored in the session.
    /// For the second user it is compared with the stored one; the stored
    /// library is then deleted unless `force_refresh` is set, which keeps it
    /// around for further refreshes.
    ///
    /// A failed pass leaves the previous results untouched.
    pub async fn compare_users(
        &mut self,
        force_refresh: bool,
        second_user: bool,
    ) -> Result<Step, CompareError> {
        self.ensure_authenticated().await?;
        self.error = None;
        self.set_progress(0.0);

        let outcome = self.run_pass(force_refresh, second_user).await;
        self.finish(outcome).await
    }

    /// Runs the comparison again with fresh data.
    ///
    /// Once both users have been compared, both libraries are fetched again
    /// with their stored tokens and the first user's library is kept for the
    /// next refresh. Before that, only the active user's pass is repeated.
    /// Refreshing the second user without a stored first user fails with
    /// [`CompareError::MissingFirstUser`] and leaves the results untouched.
    pub async fn refresh(&mut self) -> Result<Step, CompareError> {
        self.ensure_authenticated().await?;
        self.error = None;
        self.set_progress(0.0);

        let outcome = self.run_refresh().await;
        self.finish(outcome).await
    }

    /// Clears credentials, the stored first user and all results.
    pub async fn logout(&mut self) -> Result<(), StoreError> {
        self.client.clear_access_token().await?;
        self.state = AppState::default();
        self.progress = 0.0;
        self.error = None;
        Ok(())
    }

    async fn ensure_authenticated(&mut self) -> Result<(), CompareError> {
        if self.client.is_authenticated().await {
            return Ok(());
        }
        let err = CompareError::from(SpotifyError::NotAuthenticated);
        self.error = Some(err.user_message());
        Err(err)
    }

    /// Records the outcome of a pass and persists the state.
    async fn finish(&mut self, outcome: Result<Step, CompareError>) -> Result<Step, CompareError> {
        if matches!(&outcome, Err(CompareError::Spotify(e)) if e.is_auth_failure()) {
            // the client already wiped the session, do not write it back
            self.error = Some(SpotifyError::SessionExpired.to_string());
            return outcome;
        }

        match &outcome {
            Err(e) => {
                warn!(error = %e, "comparison pass failed");
                self.error = Some(e.user_message());
            }
            Ok(step) => debug!(?step, "comparison pass finished"),
        }

        if let Err(e) = self.session.save_app_state(&self.state).await {
            warn!(error = %e, "cannot store app state");
        }

        outcome
    }

    async fn run_pass(&mut self, force_refresh: bool, second_user: bool) -> Result<Step, CompareError> {
        let (snapshot, songs) = self.fetch_snapshot().await?;

        if second_user {
            let (first_tracks, first_artists) = self.session.load_first_user().await?;
            self.record_comparison(&first_tracks, &first_artists, snapshot, &songs);

            if !force_refresh {
                if let Err(e) = self.session.delete_first_user().await {
                    warn!(error = %e, "cannot delete stored first user");
                }
            }
        } else {
            self.session
                .save_first_user(&snapshot.tracks, &snapshot.artists)
                .await?;

            self.state.profiles.user1 = Some(snapshot.profile);
            self.state.is_first_user_done = true;
            self.state.current_step = Step::Second;
        }

        self.state.updated_at = Some(Utc::now());
        Ok(self.state.current_step)
    }

    async fn run_refresh(&mut self) -> Result<Step, CompareError> {
        if !self.session.is_second_user().await? {
            return self.run_pass(true, false).await;
        }

        let both_compared = self.state.current_step == Step::Comparing;
        if both_compared && self.session.token(false).await?.is_some() {
            return self.refresh_both().await;
        }

        if !self.session.has_first_user().await? {
            return Err(CompareError::MissingFirstUser);
        }
        self.run_pass(true, true).await
    }

    /// Fetches the first user with their stored token, then the second one,
    /// and compares the two. Nothing is recorded unless both fetches succeed.
    async fn refresh_both(&mut self) -> Result<Step, CompareError> {
        self.client.use_stored_token(false).await?;
        let first = self.fetch_snapshot().await;
        // the second user stays the active one whatever happened
        let restored = self.client.use_stored_token(true).await;
        let (first, _) = first?;
        restored?;

        self.set_progress(0.0);
        let (second, second_songs) = self.fetch_snapshot().await?;

        self.session
            .save_first_user(&first.tracks, &first.artists)
            .await?;

        self.state.profiles.user1 = Some(first.profile);
        self.state.is_first_user_done = true;
        self.record_comparison(&first.tracks, &first.artists, second, &second_songs);
        self.state.updated_at = Some(Utc::now());
        Ok(self.state.current_step)
    }

    fn record_comparison(
        &mut self,
        first_tracks: &[Track],
        first_artists: &[Artist],
        second: UserSnapshot,
        second_songs: &[SavedTrack],
    ) {
        let songs_in_common = common_songs(first_tracks, &second.tracks);
        let artists_in_common =
            common_artists(first_artists, &second.artists, &songs_in_common, second_songs);

        self.state.profiles.user2 = Some(second.profile);
        self.state.common_songs = songs_in_common;
        self.state.common_artists = artists_in_common;
        self.state.current_step = Step::Comparing;
    }

    /// Runs the four retrievals concurrently and reconciles their results.
    /// Also returns the raw songs, needed to resolve song credits.
    async fn fetch_snapshot(&mut self) -> Result<(UserSnapshot, Vec<SavedTrack>), SpotifyError> {
        let client = Arc::clone(&self.client);
        let sink = Arc::clone(&self.progress_sink);
        let progress = &mut self.progress;

        let (user, songs, top_artists, followed_artists) = tokio::try_join!(
            client.get_current_user(),
            client.get_all_liked_songs(|percent| {
                *progress = percent;
                sink.report(percent);
            }),
            client.get_top_artists(DEFAULT_TOP_ARTISTS_LIMIT),
            client.get_followed_artists(),
        )?;

        let artists = reconcile::merge_artists(
            reconcile::song_artists(&songs),
            top_artists,
            followed_artists,
        );
        let tracks = utils::transform_tracks(&songs);
        let profile = build_profile(user, &artists);

        Ok((
            UserSnapshot {
                profile,
                tracks,
                artists,
            },
            songs,
        ))
    }

    fn set_progress(&mut self, percent: f64) {
        self.progress = percent;
        self.progress_sink.report(percent);
    }
}

pub fn build_profile(user: CurrentUserResponse, artists: &[Artist]) -> UserProfile {
    UserProfile {
        username: user.id.clone(),
        display_name: user
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| user.id.clone()),
        avatar_url: user
            .images
            .and_then(|images| images.into_iter().next())
            .map(|image| image.url),
        followers: user.followers.and_then(|f| f.total).unwrap_or(0),
        following: artists.len(),
        top_genres: utils::top_genres(artists, TOP_GENRES),
        spotify_url: user.external_urls.and_then(|urls| urls.spotify),
        id: user.id,
    }
}
