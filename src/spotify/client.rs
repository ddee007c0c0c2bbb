use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    error::{SpotifyError, StoreError},
    pagination::PageFetcher,
    session::Session,
    throttle::Throttler,
};

use super::transport::{HttpResponse, Transport};

/// Spotify Web API client bound to one user's bearer token.
///
/// Every request goes through the client's [`Throttler`]. The token is read
/// from the [`Session`] when the client is created and can be replaced with
/// [`SpotifyClient::set_access_token`]. A 401 answer clears the token and
/// every stored session value.
pub struct SpotifyClient {
    pub(super) config: ClientConfig,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) session: Session,
    pub(super) throttler: Throttler,
    pub(super) pages: PageFetcher,
    token: RwLock<Option<String>>,
}

impl SpotifyClient {
    /// Creates a client without a token.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, session: Session) -> Self {
        let throttler = Throttler::new(config.throttle_width, config.throttle_delay);
        let pages = PageFetcher::new(config.page_size, config.throttle_width);

        Self {
            config,
            transport,
            session,
            throttler,
            pages,
            token: RwLock::new(None),
        }
    }

    /// Creates a client using the token of the user currently being onboarded.
    pub async fn from_session(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        session: Session,
    ) -> Result<Self, StoreError> {
        let client = Self::new(config, transport, session);
        let token = client.session.active_token().await?;
        *client.token.write().await = token;
        Ok(client)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Stores `token` for the first or second user and makes it the active one.
    pub async fn set_access_token(&self, token: &str, second_user: bool) -> Result<(), StoreError> {
        self.session.set_second_user(second_user).await?;
        self.session.set_token(token, second_user).await?;
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    /// Switches to the token stored for the first or second user without
    /// changing which user is active in the session.
    pub async fn use_stored_token(&self, second_user: bool) -> Result<(), StoreError> {
        let token = self.session.token(second_user).await?;
        *self.token.write().await = token;
        Ok(())
    }

    /// Forgets the token and clears the whole session.
    pub async fn clear_access_token(&self) -> Result<(), StoreError> {
        *self.token.write().await = None;
        self.session.clear_all().await
    }

    /// Sends one throttled GET request to `endpoint` and decodes the answer.
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<T, SpotifyError> {
        let Some(token) = self.token.read().await.clone() else {
            return Err(SpotifyError::NotAuthenticated);
        };

        let url = format!("{}{}", self.config.api_url, endpoint);
        let transport = Arc::clone(&self.transport);

        debug!(endpoint, "queueing request");
        let response = self
            .throttler
            .submit(async move { transport.get(&url, &token).await })
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        if response.status == 401 {
            if let Err(e) = self.clear_access_token().await {
                warn!(error = %e, "failed to clear stored credentials");
            }
            return Err(SpotifyError::SessionExpired);
        }

        if !response.is_success() {
            return Err(SpotifyError::Api {
                status: response.status,
                message: error_message(&response),
            });
        }

        serde_json::from_str(&response.body).map_err(|e| SpotifyError::Decode(e.to_string()))
    }
}

/// Best effort message for a failed response: the service's structured error
/// message, else the raw body, else a generic `HTTP <status>` line.
pub fn error_message(response: &HttpResponse) -> String {
    let generic = if response.status_text.is_empty() {
        format!("HTTP {}", response.status)
    } else {
        format!("HTTP {}: {}", response.status, response.status_text)
    };

    match serde_json::from_str::<Value>(&response.body) {
        Ok(json) => json["error"]["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or(generic),
        Err(_) if !response.body.trim().is_empty() => response.body.clone(),
        Err(_) => generic,
    }
}
