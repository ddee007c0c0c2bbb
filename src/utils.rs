use std::collections::HashSet;

use crate::types::{Artist, ArtistTableRow, SavedTrack, SongTableRow, Track};

/// Formats a duration in milliseconds as `minutes:seconds`.
///
/// Rounds to the nearest second before splitting, so 59.5 seconds becomes
/// `1:00` rather than `0:60`.
pub fn format_duration(millis: u64) -> String {
    let total_seconds = (millis + 500) / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

pub fn to_track(saved: &SavedTrack) -> Track {
    let track = &saved.track;
    Track {
        id: track.id.clone(),
        title: track.name.clone(),
        artist: track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        album_cover: track.album.images.first().map(|image| image.url.clone()),
        duration: format_duration(track.duration_ms),
        preview_url: track.preview_url.clone(),
    }
}

/// Converts a fetched library into display tracks, keeping the first
/// occurrence of every track id.
pub fn transform_tracks(songs: &[SavedTrack]) -> Vec<Track> {
    let mut tracks: Vec<Track> = songs.iter().map(to_track).collect();
    remove_duplicate_tracks(&mut tracks);
    tracks
}

pub fn remove_duplicate_tracks(tracks: &mut Vec<Track>) {
    let mut seen_ids = HashSet::new();
    tracks.retain(|track| seen_ids.insert(track.id.clone()));
}

/// First `limit` distinct genres across the given artists, in artist order.
pub fn top_genres(artists: &[Artist], limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    artists
        .iter()
        .flat_map(|a| a.genres.iter())
        .filter(|genre| seen.insert(genre.as_str()))
        .take(limit)
        .cloned()
        .collect()
}

pub fn song_rows(tracks: &[Track]) -> Vec<SongTableRow> {
    tracks
        .iter()
        .map(|t| SongTableRow {
            title: t.title.clone(),
            artist: t.artist.clone(),
            duration: t.duration.clone(),
        })
        .collect()
}

pub fn artist_rows(artists: &[Artist]) -> Vec<ArtistTableRow> {
    let mut sorted = artists.to_vec();
    sorted.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    sorted
        .into_iter()
        .map(|a| ArtistTableRow {
            name: a.name,
            genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
        })
        .collect()
}
