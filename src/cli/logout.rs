use crate::{error, success};

use super::open_engine;

pub async fn logout() {
    let (_, mut engine, _) = open_engine().await;

    if let Err(e) = engine.logout().await {
        error!("Failed to clear stored session. Err: {}", e);
    }

    success!("Logged out, all stored data has been removed.");
}
