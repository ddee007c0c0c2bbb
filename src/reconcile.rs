//! Artist reconciliation.
//!
//! A user's artists arrive from three sources: the artists credited on liked
//! songs, the top artists and the followed artists. The same artist usually
//! shows up in more than one of them, with different amounts of metadata.
//! [`merge_artists`] folds all three into one record per artist id.

use std::collections::HashMap;

use crate::types::{Artist, ArtistObject, Image, SavedTrack};

/// Image width preferred for artist pictures.
pub const PREFERRED_IMAGE_WIDTH: u32 = 300;

/// Artists credited on the given songs, one record per credit.
///
/// Song credits carry no picture of their own, so each record takes the album
/// images of the song it came from. Genres are left empty.
pub fn song_artists(songs: &[SavedTrack]) -> Vec<ArtistObject> {
    songs
        .iter()
        .flat_map(|saved| {
            let track = &saved.track;
            track.artists.iter().map(|artist| ArtistObject {
                id: artist.id.clone(),
                name: artist.name.clone(),
                images: Some(track.album.images.clone()),
                genres: Some(Vec::new()),
                external_urls: artist.external_urls.clone(),
            })
        })
        .collect()
}

/// Merges song artists, top artists and followed artists, in that order.
///
/// A later record replaces an earlier one with the same id unless the later
/// record has no images. Output order is the position where an id was first
/// seen, holding the record that won for it.
pub fn merge_artists(
    song_artists: Vec<ArtistObject>,
    top_artists: Vec<ArtistObject>,
    followed_artists: Vec<ArtistObject>,
) -> Vec<Artist> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<ArtistObject> = Vec::new();

    for artist in song_artists
        .into_iter()
        .chain(top_artists)
        .chain(followed_artists)
    {
        match positions.get(&artist.id) {
            Some(&position) => {
                if artist.has_images() {
                    merged[position] = artist;
                }
            }
            None => {
                positions.insert(artist.id.clone(), merged.len());
                merged.push(artist);
            }
        }
    }

    merged.into_iter().map(to_artist).collect()
}

pub fn to_artist(raw: ArtistObject) -> Artist {
    Artist {
        image_url: best_image(raw.images.as_deref()),
        spotify_url: raw
            .external_urls
            .and_then(|urls| urls.spotify)
            .unwrap_or_default(),
        genres: raw.genres.unwrap_or_default(),
        id: raw.id,
        name: raw.name,
    }
}

/// The 300 pixel wide variant if there is one, else the first image, else an
/// empty string.
pub fn best_image(images: Option<&[Image]>) -> String {
    let images = images.unwrap_or_default();
    images
        .iter()
        .find(|image| image.width == Some(PREFERRED_IMAGE_WIDTH))
        .or_else(|| images.first())
        .map(|image| image.url.clone())
        .unwrap_or_default()
}
