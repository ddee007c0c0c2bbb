use thiserror::Error;

/// Status used for failures that never produced an HTTP response.
pub const GENERIC_STATUS: u16 = 500;

/// Failure of a single Spotify Web API call.
///
/// Every variant maps onto a numeric status through [`SpotifyError::status`],
/// so callers can treat the error as the `{status, message}` pair the service
/// itself reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpotifyError {
    /// No bearer token is stored for the active user. No request was sent.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The service answered 401. Stored credentials have been cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Any other non-success response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport level failure, no response was received.
    #[error("{0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("{0}")]
    Decode(String),
}

impl SpotifyError {
    pub fn status(&self) -> u16 {
        match self {
            SpotifyError::NotAuthenticated | SpotifyError::SessionExpired => 401,
            SpotifyError::Api { status, .. } => *status,
            SpotifyError::Network(_) | SpotifyError::Decode(_) => GENERIC_STATUS,
        }
    }

    /// True for failures that require the user to log in again.
    pub fn is_auth_failure(&self) -> bool {
        self.status() == 401
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == 403
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot serialize stored value: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failure of one comparison pass.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Spotify(#[from] SpotifyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A refresh of the second user found no first user to compare with.
    #[error("The first user's library is no longer stored, log in the first user again")]
    MissingFirstUser,
}

impl CompareError {
    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            CompareError::Spotify(e) if e.is_auth_failure() => {
                SpotifyError::SessionExpired.to_string()
            }
            CompareError::Spotify(e) => e.to_string(),
            CompareError::Store(_) => "Failed to load user data".to_string(),
            CompareError::MissingFirstUser => self.to_string(),
        }
    }
}
