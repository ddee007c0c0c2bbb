use crate::{
    error::SpotifyError,
    pagination::Page,
    types::{CurrentUserResponse, SavedTrack, SavedTracksResponse},
};

use super::SpotifyClient;

impl SpotifyClient {
    /// Retrieves the profile of the authenticated user.
    ///
    /// Uses the `GET /me` endpoint with a single throttled request.
    ///
    /// # Returns
    ///
    /// - `Ok(CurrentUserResponse)` - id, display name, avatar images, follower
    ///   count and public profile URL
    /// - `Err(SpotifyError)` - missing token, expired session, API or network error
    pub async fn get_current_user(&self) -> Result<CurrentUserResponse, SpotifyError> {
        self.get_json("/me").await
    }

    /// Retrieves the complete liked tracks collection of the authenticated user.
    ///
    /// A probe request for a single item reveals the collection size, then
    /// all pages are requested through the throttler using the configured
    /// page size (50 by default). Tracks are returned in the order the
    /// service pages them.
    ///
    /// # Arguments
    ///
    /// * `on_progress` - receives the share of fetched pages in percent after
    ///   every group of pages. Never called for an empty library.
    ///
    /// # Errors
    ///
    /// The first failing page aborts the whole retrieval; pages fetched so
    /// far are discarded.
    ///
    /// # Example
    ///
    /// ```
    /// let songs = client
    ///     .get_all_liked_songs(|progress| println!("{progress:.0}%"))
    ///     .await?;
    /// println!("{} liked songs", songs.len());
    /// ```
    pub async fn get_all_liked_songs<P>(&self, on_progress: P) -> Result<Vec<SavedTrack>, SpotifyError>
    where
        P: FnMut(f64),
    {
        self.pages
            .fetch_all(
                |offset, limit| self.get_liked_songs_page(offset, limit),
                on_progress,
            )
            .await
    }

    async fn get_liked_songs_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Page<SavedTrack>, SpotifyError> {
        let response: SavedTracksResponse = self
            .get_json(&format!("/me/tracks?limit={limit}&offset={offset}"))
            .await?;

        Ok(Page {
            items: response.items,
            total: response.total,
        })
    }
}
