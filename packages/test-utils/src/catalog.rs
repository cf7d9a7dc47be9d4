//! Mock catalog API server for HTTP-level client tests
//!
//! Provides a [`MockCatalogServer`] that simulates the catalog/playlist API
//! endpoints so the client can be exercised without network dependencies.

use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock catalog server wrapping a [`wiremock::MockServer`]
///
/// # Example
///
/// ```rust,ignore
/// use mixtape_test_utils::{MockCatalogServer, TrackFixture};
///
/// #[tokio::test]
/// async fn test_fetch() {
///     let server = MockCatalogServer::start().await;
///     server
///         .mock_playlist_tracks("source", vec![TrackFixture::new("t1", "Song")])
///         .await;
///
///     // Point your CatalogClient at server.url()
/// }
/// ```
pub struct MockCatalogServer {
    server: MockServer,
}

impl MockCatalogServer {
    /// Start a new mock catalog server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Mount a mock returning one page of tracks for a source playlist
    pub async fn mock_playlist_tracks(&self, playlist_id: &str, tracks: Vec<TrackFixture>) {
        let items: Vec<serde_json::Value> = tracks
            .into_iter()
            .map(|t| json!({ "track": t.to_json() }))
            .collect();

        Mock::given(method("GET"))
            .and(path(format!("/playlists/{}/tracks", playlist_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": items
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock returning a playlist page containing a null track entry
    pub async fn mock_playlist_with_unavailable_track(&self, playlist_id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/playlists/{}/tracks", playlist_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "track": TrackFixture::new("t1", "Kept").to_json() },
                    { "track": null }
                ]
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock for a batched artist genre lookup
    ///
    /// Each entry is `(artist_id, genres)`; pass a `None` position via
    /// [`Self::mock_artists_with_missing`] to simulate unresolvable ids.
    pub async fn mock_artists(&self, artists: Vec<(&str, Vec<&str>)>) {
        let entries: Vec<serde_json::Value> = artists
            .into_iter()
            .map(|(id, genres)| json!({ "id": id, "genres": genres }))
            .collect();

        Mock::given(method("GET"))
            .and(path("/artists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": entries
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount an artists mock where some looked-up ids come back null
    pub async fn mock_artists_with_missing(&self, resolved: Vec<(&str, Vec<&str>)>) {
        let mut entries: Vec<serde_json::Value> = resolved
            .into_iter()
            .map(|(id, genres)| json!({ "id": id, "genres": genres }))
            .collect();
        entries.push(serde_json::Value::Null);

        Mock::given(method("GET"))
            .and(path("/artists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": entries
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock accepting the playlist clear (replace-with-empty) call
    pub async fn mock_clear_success(&self, user_id: &str, playlist_id: &str) {
        Mock::given(method("PUT"))
            .and(path(format!(
                "/users/{}/playlists/{}/tracks",
                user_id, playlist_id
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot": "s1" })))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock accepting batched track adds
    pub async fn mock_add_success(&self, user_id: &str, playlist_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!(
                "/users/{}/playlists/{}/tracks",
                user_id, playlist_id
            )))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot": "s2" })))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock accepting the description update
    pub async fn mock_description_success(&self, playlist_id: &str) {
        Mock::given(method("PUT"))
            .and(path(format!("/playlists/{}", playlist_id)))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock for an authentication failure on any endpoint
    pub async fn mock_auth_failure(&self) {
        Mock::given(path_regex(".*"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Invalid access token" }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock for rate limiting on any endpoint
    pub async fn mock_rate_limit(&self) {
        Mock::given(path_regex(".*"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("Retry-After", "60")
                    .set_body_json(json!({
                        "error": { "message": "Rate limit exceeded" }
                    })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a mock for a server error on any endpoint
    ///
    /// `failures` bounds how many times the error is served, so retry tests
    /// can let a later attempt succeed.
    pub async fn mock_server_error(&self, failures: u64) {
        Mock::given(path_regex(".*"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": { "message": "Internal server error" }
            })))
            .up_to_n_times(failures)
            .mount(&self.server)
            .await;
    }

    /// Mount a mock delaying every response by the given milliseconds
    pub async fn mock_delay(&self, delay_ms: u64) {
        Mock::given(path_regex(".*"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(std::time::Duration::from_millis(delay_ms))
                    .set_body_json(json!({ "items": [] })),
            )
            .mount(&self.server)
            .await;
    }
}

/// Fixture for building catalog track wire JSON
#[derive(Debug, Clone)]
pub struct TrackFixture {
    pub id: Option<String>,
    pub name: String,
    pub duration_ms: Option<u32>,
    pub artist_id: Option<String>,
    pub artist_name: String,
    pub speechiness: Option<f32>,
    pub instrumentalness: Option<f32>,
}

impl TrackFixture {
    /// Create a plain full-length track fixture
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: name.to_string(),
            duration_ms: Some(215_000),
            artist_id: Some(format!("artist-{}", id)),
            artist_name: "Test Artist".to_string(),
            speechiness: None,
            instrumentalness: None,
        }
    }

    /// Set the primary artist
    pub fn by(mut self, artist_id: &str, artist_name: &str) -> Self {
        self.artist_id = Some(artist_id.to_string());
        self.artist_name = artist_name.to_string();
        self
    }

    /// Set the duration in milliseconds
    pub fn lasting(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Drop the duration, simulating a catalog entry without one
    pub fn without_duration(mut self) -> Self {
        self.duration_ms = None;
        self
    }

    /// Attach audio-feature signals
    pub fn with_features(mut self, speechiness: f32, instrumentalness: f32) -> Self {
        self.speechiness = Some(speechiness);
        self.instrumentalness = Some(instrumentalness);
        self
    }

    /// Drop the track id, simulating a local/unavailable track
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Convert to wire JSON
    pub fn to_json(&self) -> serde_json::Value {
        let mut track = json!({
            "id": self.id,
            "name": self.name,
            "duration_ms": self.duration_ms,
            "artists": [{ "id": self.artist_id, "name": self.artist_name }]
        });
        if self.speechiness.is_some() || self.instrumentalness.is_some() {
            track["features"] = json!({
                "speechiness": self.speechiness,
                "instrumentalness": self.instrumentalness
            });
        }
        track
    }
}
