use tracing::warn;

use crate::{
    error::SpotifyError,
    types::{ArtistObject, FollowedArtistsResponse, TopArtistsResponse},
};

use super::SpotifyClient;

pub const DEFAULT_TOP_ARTISTS_LIMIT: usize = 50;
pub const FOLLOWED_ARTISTS_LIMIT: usize = 50;

impl SpotifyClient {
    /// Retrieves the user's top artists over the medium term time range.
    ///
    /// Uses `GET /me/top/artists` with `time_range=medium_term`.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of artists to return (1-50)
    ///
    /// # Scope Handling
    ///
    /// The endpoint needs the `user-top-read` scope. A 403 answer is treated
    /// as "no top artists" and yields an empty list instead of an error, so
    /// the comparison can go on with the remaining sources.
    pub async fn get_top_artists(&self, limit: usize) -> Result<Vec<ArtistObject>, SpotifyError> {
        let endpoint = format!("/me/top/artists?limit={limit}&time_range=medium_term");
        match self.get_json::<TopArtistsResponse>(&endpoint).await {
            Ok(response) => Ok(response.items),
            Err(e) if e.is_forbidden() => {
                warn!(error = %e, "top artists not permitted, continuing without them");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Retrieves the first page of artists followed by the user.
    ///
    /// Uses `GET /me/following?type=artist&limit=50`. Like
    /// [`SpotifyClient::get_top_artists`], a 403 answer yields an empty list.
    pub async fn get_followed_artists(&self) -> Result<Vec<ArtistObject>, SpotifyError> {
        let endpoint = format!("/me/following?type=artist&limit={FOLLOWED_ARTISTS_LIMIT}");
        match self.get_json::<FollowedArtistsResponse>(&endpoint).await {
            Ok(response) => Ok(response.artists.items),
            Err(e) if e.is_forbidden() => {
                warn!(error = %e, "followed artists not permitted, continuing without them");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
