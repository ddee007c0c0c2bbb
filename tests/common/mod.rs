#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tunetwin::{
    config::ClientConfig,
    session::Session,
    spotify::{HttpResponse, SpotifyClient, Transport, TransportError},
    store::MemoryStore,
    types::{
        ArtistObject, ArtistsContainer, CurrentUserResponse, ExternalUrls, FollowedArtistsResponse,
        Followers, Image, SavedTrack, SavedTracksResponse, TopArtistsResponse, TrackAlbum,
        TrackArtist, TrackObject,
    },
};

pub const API_URL: &str = "http://spotify.test/v1";
pub const PAGE_SIZE: usize = 2;

/// One user's library as served by [`FakeSpotify`].
#[derive(Clone, Default)]
pub struct FakeLibrary {
    pub user_id: String,
    pub songs: Vec<SavedTrack>,
    pub top_artists: Vec<ArtistObject>,
    pub followed_artists: Vec<ArtistObject>,
    /// Canned answers by endpoint path, query ignored.
    pub overrides: Vec<(String, u16, String)>,
}

impl FakeLibrary {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Self::default()
        }
    }

    pub fn with_songs(mut self, songs: Vec<SavedTrack>) -> Self {
        self.songs = songs;
        self
    }

    pub fn with_top_artists(mut self, artists: Vec<ArtistObject>) -> Self {
        self.top_artists = artists;
        self
    }

    pub fn with_followed_artists(mut self, artists: Vec<ArtistObject>) -> Self {
        self.followed_artists = artists;
        self
    }

    pub fn failing(mut self, path: &str, status: u16, body: &str) -> Self {
        self.overrides
            .push((path.to_string(), status, body.to_string()));
        self
    }

    fn respond(&self, endpoint: &str) -> HttpResponse {
        let (path, query) = endpoint.split_once('?').unwrap_or((endpoint, ""));

        if let Some((_, status, body)) = self.overrides.iter().find(|(p, _, _)| p == path) {
            return HttpResponse::new(*status, body.clone());
        }

        let params: HashMap<&str, &str> = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .collect();

        let body = match path {
            "/me" => serde_json::to_string(&CurrentUserResponse {
                id: self.user_id.clone(),
                display_name: Some(format!("{} display", self.user_id)),
                images: Some(vec![image("avatar", 64)]),
                followers: Some(Followers { total: Some(7) }),
                external_urls: Some(ExternalUrls {
                    spotify: Some(format!("https://open.spotify.com/user/{}", self.user_id)),
                }),
            }),
            "/me/tracks" => {
                let offset: usize = params["offset"].parse().unwrap();
                let limit: usize = params["limit"].parse().unwrap();
                let items = self
                    .songs
                    .iter()
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect();
                serde_json::to_string(&SavedTracksResponse {
                    items,
                    total: self.songs.len(),
                })
            }
            "/me/top/artists" => serde_json::to_string(&TopArtistsResponse {
                items: self.top_artists.clone(),
            }),
            "/me/following" => serde_json::to_string(&FollowedArtistsResponse {
                artists: ArtistsContainer {
                    items: self.followed_artists.clone(),
                    next: None,
                    total: Some(self.followed_artists.len() as u64),
                },
            }),
            _ => return HttpResponse::new(404, ""),
        };

        HttpResponse::new(200, body.unwrap())
    }
}

/// In-process stand-in for the Web API. Records every requested endpoint.
#[derive(Default)]
pub struct FakeSpotify {
    library: Mutex<FakeLibrary>,
    by_token: Mutex<HashMap<String, FakeLibrary>>,
    calls: Mutex<Vec<String>>,
    offline: AtomicBool,
}

impl FakeSpotify {
    pub fn new(library: FakeLibrary) -> Self {
        Self {
            library: Mutex::new(library),
            ..Self::default()
        }
    }

    /// Serves a different user's library from now on.
    pub fn serve(&self, library: FakeLibrary) {
        *self.library.lock().unwrap() = library;
    }

    /// Serves `library` to requests carrying `token`, whatever `serve` set.
    pub fn serve_token(&self, token: &str, library: FakeLibrary) {
        self.by_token
            .lock()
            .unwrap()
            .insert(token.to_string(), library);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|endpoint| endpoint.split('?').next() == Some(path))
            .count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for FakeSpotify {
    async fn get(&self, url: &str, bearer: &str) -> Result<HttpResponse, TransportError> {
        assert!(!bearer.is_empty(), "request sent without a token");

        let endpoint = url.trim_start_matches(API_URL).to_string();
        self.calls.lock().unwrap().push(endpoint.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(TransportError("connection refused".to_string()));
        }

        if let Some(library) = self.by_token.lock().unwrap().get(bearer) {
            return Ok(library.respond(&endpoint));
        }
        Ok(self.library.lock().unwrap().respond(&endpoint))
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig {
        api_url: API_URL.to_string(),
        throttle_width: 3,
        throttle_delay: Duration::ZERO,
        page_size: PAGE_SIZE,
    }
}

pub struct Harness {
    pub client: Arc<SpotifyClient>,
    pub spotify: Arc<FakeSpotify>,
    pub store: Arc<MemoryStore>,
    pub session: Session,
}

/// Client on top of a fake API and an in-memory session, without a token.
pub fn harness(library: FakeLibrary) -> Harness {
    let spotify = Arc::new(FakeSpotify::new(library));
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(store.clone());
    let client = Arc::new(SpotifyClient::new(
        test_config(),
        spotify.clone(),
        session.clone(),
    ));

    Harness {
        client,
        spotify,
        store,
        session,
    }
}

pub fn image(url: &str, width: u32) -> Image {
    Image {
        url: url.to_string(),
        width: Some(width),
        height: Some(width),
    }
}

pub fn artist(id: &str, name: &str, images: Vec<Image>, genres: &[&str]) -> ArtistObject {
    ArtistObject {
        id: id.to_string(),
        name: name.to_string(),
        images: Some(images),
        genres: Some(genres.iter().map(|g| g.to_string()).collect()),
        external_urls: Some(ExternalUrls {
            spotify: Some(format!("https://open.spotify.com/artist/{id}")),
        }),
    }
}

/// A liked song credited to `artists`, given as `(id, name)` pairs.
pub fn song(id: &str, name: &str, artists: &[(&str, &str)]) -> SavedTrack {
    SavedTrack {
        track: TrackObject {
            id: id.to_string(),
            name: name.to_string(),
            artists: artists
                .iter()
                .map(|(id, name)| TrackArtist {
                    id: id.to_string(),
                    name: name.to_string(),
                    external_urls: None,
                })
                .collect(),
            album: TrackAlbum {
                images: vec![image(&format!("cover-{id}"), 640)],
            },
            duration_ms: 180_000,
            preview_url: None,
        },
    }
}

pub fn numbered_songs(count: usize) -> Vec<SavedTrack> {
    (0..count)
        .map(|i| song(&format!("t{i}"), &format!("Song {i}"), &[("a0", "Artist 0")]))
        .collect()
}
