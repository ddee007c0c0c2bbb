//! Two-user library comparison.
//!
//! The intersection helpers in this module are pure; [`ComparisonEngine`]
//! drives the retrieval for each user and keeps the comparison state.

mod engine;

use std::collections::HashSet;

pub use engine::{ComparisonEngine, ProgressSink, build_profile};

use crate::types::{Artist, SavedTrack, Track};

/// Tracks of `second` whose id also appears in `first`, in `second`'s order.
pub fn common_songs(first: &[Track], second: &[Track]) -> Vec<Track> {
    let first_ids: HashSet<&str> = first.iter().map(|t| t.id.as_str()).collect();
    second
        .iter()
        .filter(|t| first_ids.contains(t.id.as_str()))
        .cloned()
        .collect()
}

/// Artists both users share.
///
/// The result starts with the artists of `second` whose id is also in
/// `first`, followed by the artists of `second` credited on at least one of
/// the `common` songs. Credits are looked up in `second_songs`, the second
/// user's raw library. Each id appears once.
pub fn common_artists(
    first: &[Artist],
    second: &[Artist],
    common: &[Track],
    second_songs: &[SavedTrack],
) -> Vec<Artist> {
    let first_ids: HashSet<&str> = first.iter().map(|a| a.id.as_str()).collect();
    let mut result: Vec<Artist> = second
        .iter()
        .filter(|a| first_ids.contains(a.id.as_str()))
        .cloned()
        .collect();

    let common_ids: HashSet<&str> = common.iter().map(|t| t.id.as_str()).collect();
    let credited: HashSet<&str> = second_songs
        .iter()
        .filter(|saved| common_ids.contains(saved.track.id.as_str()))
        .flat_map(|saved| saved.track.artists.iter().map(|a| a.id.as_str()))
        .collect();

    let mut included: HashSet<String> = result.iter().map(|a| a.id.clone()).collect();
    for artist in second {
        if credited.contains(artist.id.as_str()) && included.insert(artist.id.clone()) {
            result.push(artist.clone());
        }
    }

    result
}
