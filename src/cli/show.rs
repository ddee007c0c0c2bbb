use tabled::Table;

use crate::{
    info,
    types::{AppState, Step, UserProfile},
    utils, warning,
};

use super::session;

pub async fn show() {
    match session().load_app_state().await {
        Ok(state) => render(&state),
        Err(e) => warning!("Failed to load stored results. Err: {}", e),
    }
}

pub(super) fn render(state: &AppState) {
    for (label, profile) in [
        ("First user", &state.profiles.user1),
        ("Second user", &state.profiles.user2),
    ] {
        if let Some(profile) = profile {
            print_profile(label, profile);
        }
    }

    match state.current_step {
        Step::First => {
            info!("Nothing fetched yet. Run tunetwin login --token <TOKEN>.");
            return;
        }
        Step::Second => {
            info!("Waiting for the second user. Run tunetwin login --second --token <TOKEN>.");
            return;
        }
        Step::Comparing => {}
    }

    if let Some(updated_at) = state.updated_at {
        info!("Compared at {}", updated_at.format("%Y-%m-%d %H:%M"));
    }

    if state.common_songs.is_empty() {
        info!("No songs in common.");
    } else {
        println!(
            "Common songs ({})\n{}\n",
            state.common_songs.len(),
            Table::new(utils::song_rows(&state.common_songs))
        );
    }

    if state.common_artists.is_empty() {
        info!("No artists in common.");
    } else {
        println!(
            "Common artists ({})\n{}\n",
            state.common_artists.len(),
            Table::new(utils::artist_rows(&state.common_artists))
        );
    }
}

fn print_profile(label: &str, profile: &UserProfile) {
    let genres = if profile.top_genres.is_empty() {
        String::from("-")
    } else {
        profile.top_genres.join(", ")
    };

    info!(
        "{label}: {name} ({followers} followers, {following} artists, genres: {genres})",
        label = label,
        name = profile.display_name,
        followers = profile.followers,
        following = profile.following,
        genres = genres
    );
}
