//! Shared fixtures for scheduler integration tests
//!
//! Provides an in-process [`FakeCatalog`] implementing the catalog
//! collaborator contract, with call recording and failure injection.

// Each integration test binary compiles this module separately and uses
// only a subset of the helpers.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use mixtape_catalog_client::{Catalog, CatalogError, CatalogResult, Track};
use mixtape_scheduler::models::{Ingredient, Job, PlaylistRef};

/// One recorded catalog call
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    PlaylistTracks { playlist_id: String, limit: u32 },
    ArtistGenres { ids: Vec<String> },
    Clear { playlist_id: String },
    Add { playlist_id: String, ids: Vec<String> },
    SetDescription { playlist_id: String },
}

/// In-process catalog fake with seeded data and injectable failures
#[derive(Default)]
pub struct FakeCatalog {
    playlists: Mutex<HashMap<String, Vec<Track>>>,
    genres: Mutex<HashMap<String, Vec<String>>>,
    targets: Mutex<HashMap<String, Vec<String>>>,
    calls: Mutex<Vec<CatalogCall>>,
    fetch_delay: Mutex<Option<Duration>>,
    fail_fetch: AtomicBool,
    fail_clear: AtomicBool,
    fail_add: AtomicBool,
    fail_description: AtomicBool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a source playlist with tracks
    pub fn seed_playlist(&self, playlist_id: &str, tracks: Vec<Track>) {
        self.playlists
            .lock()
            .unwrap()
            .insert(playlist_id.to_string(), tracks);
    }

    /// Seed resolved genres for an artist
    pub fn seed_genres(&self, artist_id: &str, genres: &[&str]) {
        self.genres.lock().unwrap().insert(
            artist_id.to_string(),
            genres.iter().map(|g| g.to_string()).collect(),
        );
    }

    /// Delay every source fetch, simulating a slow remote
    pub fn delay_fetch(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_on_fetch(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    pub fn fail_on_clear(&self) {
        self.fail_clear.store(true, Ordering::SeqCst);
    }

    pub fn fail_on_add(&self) {
        self.fail_add.store(true, Ordering::SeqCst);
    }

    pub fn fail_on_description(&self) {
        self.fail_description.store(true, Ordering::SeqCst);
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The add batches issued against a target playlist, in order
    pub fn add_batches(&self, playlist_id: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CatalogCall::Add {
                    playlist_id: p,
                    ids,
                } if p == playlist_id => Some(ids),
                _ => None,
            })
            .collect()
    }

    /// Current contents of a target playlist after write-back
    pub fn written_tracks(&self, playlist_id: &str) -> Vec<String> {
        self.targets
            .lock()
            .unwrap()
            .get(playlist_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Distinct artist ids looked up across all genre calls
    pub fn genre_lookups(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CatalogCall::ArtistGenres { ids } => Some(ids),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn record(&self, call: CatalogCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable() -> CatalogError {
        CatalogError::Api {
            status: 503,
            message: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn playlist_tracks(
        &self,
        _token: &str,
        playlist_id: &str,
        limit: u32,
    ) -> CatalogResult<Vec<Track>> {
        self.record(CatalogCall::PlaylistTracks {
            playlist_id: playlist_id.to_string(),
            limit,
        });
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let playlists = self.playlists.lock().unwrap();
        match playlists.get(playlist_id) {
            Some(tracks) => Ok(tracks.iter().take(limit as usize).cloned().collect()),
            None => Err(CatalogError::Api {
                status: 404,
                message: format!("playlist {} not found", playlist_id),
            }),
        }
    }

    async fn artist_genres(
        &self,
        _token: &str,
        artist_ids: &[String],
    ) -> CatalogResult<HashMap<String, Vec<String>>> {
        self.record(CatalogCall::ArtistGenres {
            ids: artist_ids.to_vec(),
        });
        let genres = self.genres.lock().unwrap();
        Ok(artist_ids
            .iter()
            .filter_map(|id| genres.get(id).map(|g| (id.clone(), g.clone())))
            .collect())
    }

    async fn clear_playlist(
        &self,
        _token: &str,
        _user_id: &str,
        playlist_id: &str,
    ) -> CatalogResult<()> {
        self.record(CatalogCall::Clear {
            playlist_id: playlist_id.to_string(),
        });
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.targets
            .lock()
            .unwrap()
            .insert(playlist_id.to_string(), Vec::new());
        Ok(())
    }

    async fn add_tracks(
        &self,
        _token: &str,
        _user_id: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> CatalogResult<()> {
        self.record(CatalogCall::Add {
            playlist_id: playlist_id.to_string(),
            ids: track_ids.to_vec(),
        });
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.targets
            .lock()
            .unwrap()
            .entry(playlist_id.to_string())
            .or_default()
            .extend(track_ids.iter().cloned());
        Ok(())
    }

    async fn set_playlist_description(
        &self,
        _token: &str,
        playlist_id: &str,
        _description: &str,
    ) -> CatalogResult<()> {
        self.record(CatalogCall::SetDescription {
            playlist_id: playlist_id.to_string(),
        });
        if self.fail_description.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(())
    }
}

/// A full-length track by the given artist
pub fn track(id: &str, artist_id: &str) -> Track {
    Track {
        id: Some(id.to_string()),
        name: format!("Track {}", id),
        duration_ms: Some(215_000),
        artist_id: Some(artist_id.to_string()),
        artist_name: Some(format!("Artist {}", artist_id)),
        features: None,
    }
}

/// A track the catalog could not resolve to an id
pub fn local_track(name: &str) -> Track {
    Track {
        id: None,
        name: name.to_string(),
        duration_ms: Some(215_000),
        artist_id: None,
        artist_name: None,
        features: None,
    }
}

pub fn playlist(id: &str) -> PlaylistRef {
    PlaylistRef {
        id: id.to_string(),
        name: format!("Playlist {}", id),
    }
}

pub fn ingredient(source_id: &str, quantity: u32) -> Ingredient {
    Ingredient {
        source: playlist(source_id),
        quantity,
    }
}

/// A job targeting playlist "target" for user "alice"
pub fn job_with_recipe(recipe: Vec<Ingredient>) -> Job {
    let mut job = Job::new("alice", "Test mix", playlist("target"));
    job.recipe = recipe;
    job
}
