mod common;

use common::{artist, image, song};
use tunetwin::{
    reconcile::{merge_artists, song_artists},
    types::ArtistObject,
};

fn ids(artists: &[tunetwin::types::Artist]) -> Vec<&str> {
    artists.iter().map(|a| a.id.as_str()).collect()
}

#[test]
fn song_credits_take_the_album_images() {
    let songs = vec![song("t1", "Song", &[("a1", "One"), ("a2", "Two")])];

    let credited = song_artists(&songs);

    assert_eq!(credited.len(), 2);
    assert_eq!(credited[0].id, "a1");
    assert_eq!(credited[1].id, "a2");
    for record in &credited {
        assert_eq!(record.images.as_deref(), Some(&[image("cover-t1", 640)][..]));
        assert_eq!(record.genres.as_deref(), Some(&[][..]));
    }
}

#[test]
fn each_artist_appears_once_in_first_seen_order() {
    let songs = vec![
        song("t1", "Song 1", &[("a2", "Two")]),
        song("t2", "Song 2", &[("a1", "One"), ("a2", "Two")]),
    ];
    let top = vec![artist("a3", "Three", vec![], &[]), artist("a1", "One", vec![], &[])];
    let followed = vec![artist("a4", "Four", vec![], &[]), artist("a3", "Three", vec![], &[])];

    let merged = merge_artists(song_artists(&songs), top, followed);

    assert_eq!(ids(&merged), vec!["a2", "a1", "a3", "a4"]);
}

#[test]
fn later_records_with_images_win() {
    let songs = vec![song("t1", "Song", &[("a1", "One")])];
    let top = vec![artist(
        "a1",
        "One",
        vec![image("large", 640), image("medium", 300)],
        &["indie", "rock"],
    )];

    let merged = merge_artists(song_artists(&songs), top, vec![]);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].image_url, "medium");
    assert_eq!(merged[0].genres, vec!["indie", "rock"]);
    assert_eq!(merged[0].spotify_url, "https://open.spotify.com/artist/a1");
}

#[test]
fn later_records_without_images_do_not_replace() {
    let top = vec![artist("a1", "One", vec![image("picture", 640)], &["pop"])];
    let followed = vec![
        artist("a1", "One (followed)", vec![], &["other"]),
        ArtistObject {
            id: "a1".to_string(),
            name: "One (no images)".to_string(),
            ..ArtistObject::default()
        },
    ];

    let merged = merge_artists(vec![], top, followed);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].name, "One");
    assert_eq!(merged[0].image_url, "picture");
    assert_eq!(merged[0].genres, vec!["pop"]);
}

#[test]
fn merging_twice_changes_nothing() {
    let songs = vec![
        song("t1", "Song 1", &[("a1", "One")]),
        song("t2", "Song 2", &[("a2", "Two")]),
    ];
    let top = vec![artist("a2", "Two", vec![image("two", 300)], &["jazz"])];
    let followed = vec![artist("a3", "Three", vec![], &[])];

    let once = merge_artists(song_artists(&songs), top.clone(), followed.clone());

    // the merged records fed back in as an extra source
    let again: Vec<ArtistObject> = once
        .iter()
        .map(|a| {
            artist(
                &a.id,
                &a.name,
                if a.image_url.is_empty() {
                    vec![]
                } else {
                    vec![image(&a.image_url, 300)]
                },
                &a.genres.iter().map(String::as_str).collect::<Vec<_>>(),
            )
        })
        .collect();
    let twice = merge_artists(song_artists(&songs), top, again);

    assert_eq!(ids(&once), ids(&twice));
    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(a.image_url, b.image_url);
        assert_eq!(a.genres, b.genres);
    }
}

#[test]
fn no_sources_give_no_artists() {
    assert!(merge_artists(vec![], vec![], vec![]).is_empty());
}
