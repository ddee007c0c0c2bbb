use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::{
    error::StoreError,
    store::KeyValueStore,
    types::{AppState, Artist, Track},
};

pub const KEY_TOKEN_USER1: &str = "spotify_token_user1";
pub const KEY_TOKEN_USER2: &str = "spotify_token_user2";
pub const KEY_IS_SECOND_USER: &str = "isSecondUser";
pub const KEY_APP_STATE: &str = "appState";
pub const KEY_FIRST_USER_SONGS: &str = "firstUserSongs";
pub const KEY_FIRST_USER_ARTISTS: &str = "firstUserArtists";

pub const ALL_KEYS: [&str; 6] = [
    KEY_TOKEN_USER1,
    KEY_TOKEN_USER2,
    KEY_IS_SECOND_USER,
    KEY_APP_STATE,
    KEY_FIRST_USER_SONGS,
    KEY_FIRST_USER_ARTISTS,
];

/// Credentials and state that survive between two invocations.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn token(&self, second_user: bool) -> Result<Option<String>, StoreError> {
        self.store.get(token_key(second_user)).await
    }

    /// Token of the user currently being onboarded.
    pub async fn active_token(&self) -> Result<Option<String>, StoreError> {
        let second_user = self.is_second_user().await?;
        self.token(second_user).await
    }

    pub async fn set_token(&self, token: &str, second_user: bool) -> Result<(), StoreError> {
        self.store.set(token_key(second_user), token).await
    }

    pub async fn is_second_user(&self) -> Result<bool, StoreError> {
        Ok(self.store.get(KEY_IS_SECOND_USER).await?.as_deref() == Some("true"))
    }

    pub async fn set_second_user(&self, second_user: bool) -> Result<(), StoreError> {
        self.store
            .set(KEY_IS_SECOND_USER, &second_user.to_string())
            .await
    }

    pub async fn save_first_user(
        &self,
        tracks: &[Track],
        artists: &[Artist],
    ) -> Result<(), StoreError> {
        self.write_json(KEY_FIRST_USER_SONGS, tracks).await?;
        self.write_json(KEY_FIRST_USER_ARTISTS, artists).await
    }

    /// The first user's tracks and artists. Missing or unreadable entries
    /// come back empty.
    pub async fn load_first_user(&self) -> Result<(Vec<Track>, Vec<Artist>), StoreError> {
        let tracks = self.read_json_or_default(KEY_FIRST_USER_SONGS).await?;
        let artists = self.read_json_or_default(KEY_FIRST_USER_ARTISTS).await?;
        Ok((tracks, artists))
    }

    pub async fn has_first_user(&self) -> Result<bool, StoreError> {
        Ok(self.store.get(KEY_FIRST_USER_SONGS).await?.is_some())
    }

    pub async fn delete_first_user(&self) -> Result<(), StoreError> {
        self.store.delete(KEY_FIRST_USER_SONGS).await?;
        self.store.delete(KEY_FIRST_USER_ARTISTS).await
    }

    pub async fn save_app_state(&self, state: &AppState) -> Result<(), StoreError> {
        self.write_json(KEY_APP_STATE, state).await
    }

    pub async fn load_app_state(&self) -> Result<AppState, StoreError> {
        self.read_json_or_default(KEY_APP_STATE).await
    }

    /// Removes tokens, flags, the stored first user and the app state.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        for key in ALL_KEYS {
            self.store.delete(key).await?;
        }
        Ok(())
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json).await
    }

    async fn read_json_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, StoreError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(T::default());
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "ignoring corrupt stored value");
                Ok(T::default())
            }
        }
    }
}

fn token_key(second_user: bool) -> &'static str {
    if second_user {
        KEY_TOKEN_USER2
    } else {
        KEY_TOKEN_USER1
    }
}
