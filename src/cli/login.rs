use crate::{config, error, warning};

use super::{compare::run_pass, open_engine};

/// Stores a bearer token for the first or second user and fetches that
/// user's library right away.
pub async fn login(token: Option<String>, second_user: bool) {
    let Some(token) = token.or_else(config::spotify_access_token) else {
        error!("No token given. Pass --token or set SPOTIFY_ACCESS_TOKEN.");
    };

    let (client, mut engine, bar) = open_engine().await;

    if second_user && !client.session().has_first_user().await.unwrap_or(false) {
        warning!("No library of a first user is stored. Run tunetwin login for the first user before the second.");
    }

    if let Err(e) = client.set_access_token(token.trim(), second_user).await {
        error!("Failed to store token. Err: {}", e);
    }

    run_pass(&mut engine, &bar, second_user).await;
}
