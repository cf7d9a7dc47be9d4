//! HTTP-level tests for the catalog client against a wiremock server

use std::time::Duration;

use assert_matches::assert_matches;
use mixtape_catalog_client::{Catalog, CatalogClient, CatalogError};
use mixtape_test_utils::{MockCatalogServer, TrackFixture};

#[tokio::test]
async fn test_playlist_tracks_parses_wire_format() {
    let server = MockCatalogServer::start().await;
    server
        .mock_playlist_tracks(
            "source",
            vec![
                TrackFixture::new("t1", "Opening Song")
                    .by("a1", "The Openers")
                    .lasting(180_000),
                TrackFixture::new("t2", "Closer")
                    .by("a2", "Finale")
                    .with_features(0.05, 0.6),
            ],
        )
        .await;

    let client = CatalogClient::new(server.url()).unwrap();
    let tracks = client.playlist_tracks("token", "source", 10).await.unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].id.as_deref(), Some("t1"));
    assert_eq!(tracks[0].name, "Opening Song");
    assert_eq!(tracks[0].duration_ms, Some(180_000));
    assert_eq!(tracks[0].artist_id.as_deref(), Some("a1"));
    assert_eq!(tracks[0].artist_name.as_deref(), Some("The Openers"));
    assert!(tracks[0].features.is_none());

    let features = tracks[1].features.unwrap();
    assert_eq!(features.speechiness, Some(0.05));
    assert_eq!(features.instrumentalness, Some(0.6));
}

#[tokio::test]
async fn test_unavailable_playlist_entries_are_skipped() {
    let server = MockCatalogServer::start().await;
    server.mock_playlist_with_unavailable_track("source").await;

    let client = CatalogClient::new(server.url()).unwrap();
    let tracks = client.playlist_tracks("token", "source", 10).await.unwrap();

    // The null entry is dropped; the id-less case is handled by curation
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].name, "Kept");
}

#[tokio::test]
async fn test_id_less_track_survives_parse_without_id() {
    let server = MockCatalogServer::start().await;
    server
        .mock_playlist_tracks("source", vec![TrackFixture::new("t1", "Local").without_id()])
        .await;

    let client = CatalogClient::new(server.url()).unwrap();
    let tracks = client.playlist_tracks("token", "source", 10).await.unwrap();
    assert_eq!(tracks.len(), 1);
    assert!(tracks[0].id.is_none());
}

#[tokio::test]
async fn test_track_without_duration_parses_as_unknown() {
    let server = MockCatalogServer::start().await;
    server
        .mock_playlist_tracks(
            "source",
            vec![TrackFixture::new("t1", "Unmeasured").without_duration()],
        )
        .await;

    let client = CatalogClient::new(server.url()).unwrap();
    let tracks = client.playlist_tracks("token", "source", 10).await.unwrap();
    assert_eq!(tracks[0].duration_ms, None);
}

#[tokio::test]
async fn test_artist_genres_skips_unresolvable_ids() {
    let server = MockCatalogServer::start().await;
    server
        .mock_artists_with_missing(vec![("a1", vec!["shoegaze", "dream pop"])])
        .await;

    let client = CatalogClient::new(server.url()).unwrap();
    let ids = vec!["a1".to_string(), "ghost".to_string()];
    let genres = client.artist_genres("token", &ids).await.unwrap();

    assert_eq!(genres.len(), 1);
    assert_eq!(
        genres.get("a1").unwrap(),
        &vec!["shoegaze".to_string(), "dream pop".to_string()]
    );
    assert!(!genres.contains_key("ghost"));
}

#[tokio::test]
async fn test_reads_retry_past_transient_server_errors() {
    let server = MockCatalogServer::start().await;
    // Two failures, then the mounted success mock answers
    server.mock_server_error(2).await;
    server
        .mock_playlist_tracks("source", vec![TrackFixture::new("t1", "Song")])
        .await;

    let client = CatalogClient::new(server.url()).unwrap();
    let tracks = client.playlist_tracks("token", "source", 10).await.unwrap();
    assert_eq!(tracks.len(), 1);
}

#[tokio::test]
async fn test_rate_limit_maps_to_rate_limited() {
    let server = MockCatalogServer::start().await;
    server.mock_rate_limit().await;

    let client = CatalogClient::new(server.url()).unwrap();
    let result = client
        .add_tracks("token", "user", "playlist", &["t1".to_string()])
        .await;
    assert_matches!(result, Err(CatalogError::RateLimited));
}

#[tokio::test]
async fn test_auth_failure_maps_to_api_401() {
    let server = MockCatalogServer::start().await;
    server.mock_auth_failure().await;

    let client = CatalogClient::new(server.url()).unwrap();
    let result = client.clear_playlist("bad-token", "user", "playlist").await;
    match result {
        Err(CatalogError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid access token");
        }
        other => panic!("expected 401 Api error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockCatalogServer::start().await;
    server.mock_delay(500).await;

    let client = CatalogClient::with_timeout(server.url(), Duration::from_millis(50)).unwrap();
    let result = client
        .set_playlist_description("token", "playlist", "text")
        .await;
    assert_matches!(result, Err(CatalogError::Timeout));
}
