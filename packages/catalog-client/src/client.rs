//! HTTP catalog client implementation

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::json;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::api::{Catalog, MAX_ADD_IDS, MAX_ARTIST_IDS};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{ArtistsResponse, ErrorResponse, PlaylistTracksResponse, Track};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default number of retry attempts for transient read failures
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds)
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Page size for playlist track fetches
const TRACK_PAGE_SIZE: u32 = 100;

/// Catalog API client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http_client: Client,
    base_url: String,
    max_retries: u32,
}

impl CatalogClient {
    /// Create a new catalog client against the given API base URL
    ///
    /// # Errors
    /// Returns `CatalogError::InvalidInput` if the base URL does not parse.
    pub fn new(base_url: impl AsRef<str>) -> CatalogResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a catalog client with a custom per-request timeout
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> CatalogResult<Self> {
        let parsed = Url::parse(base_url.as_ref())
            .map_err(|e| CatalogError::InvalidInput(format!("invalid base URL: {}", e)))?;

        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("Mixtape/1.0")
            .build()?;

        Ok(Self {
            http_client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.http_client
            .request(method, self.endpoint(path))
            .bearer_auth(token)
    }

    /// Execute an operation with retry logic for transient failures
    async fn with_retry<T, F, Fut>(&self, operation: F) -> CatalogResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = CatalogResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                    warn!(
                        attempt = attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Catalog request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send a request and surface rate limits, timeouts and API errors
    async fn execute(&self, request: RequestBuilder) -> CatalogResult<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout
            } else {
                CatalogError::Http(e)
            }
        })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Catalog API rate limited");
            return Err(CatalogError::RateLimited);
        }

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Fetch one page of playlist tracks
    async fn track_page(
        &self,
        token: &str,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> CatalogResult<Vec<Track>> {
        let response = self
            .execute(
                self.request(
                    Method::GET,
                    &format!("playlists/{}/tracks", playlist_id),
                    token,
                )
                .query(&[("limit", limit.to_string()), ("offset", offset.to_string())]),
            )
            .await?;

        let page: PlaylistTracksResponse = response.json().await.map_err(CatalogError::Http)?;
        Ok(page
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .map(Into::into)
            .collect())
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    #[instrument(skip(self, token))]
    async fn playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        limit: u32,
    ) -> CatalogResult<Vec<Track>> {
        if playlist_id.is_empty() {
            return Err(CatalogError::InvalidInput(
                "playlist id cannot be empty".to_string(),
            ));
        }

        let mut tracks = Vec::new();
        let mut offset = 0u32;
        while (tracks.len() as u32) < limit {
            let page_size = TRACK_PAGE_SIZE.min(limit - tracks.len() as u32);
            let page = self
                .with_retry(|| self.track_page(token, playlist_id, page_size, offset))
                .await?;
            let page_len = page.len() as u32;
            tracks.extend(page);
            if page_len < page_size {
                break;
            }
            offset += page_len;
        }

        debug!(
            playlist_id = %playlist_id,
            fetched = tracks.len(),
            "Fetched playlist tracks"
        );
        Ok(tracks)
    }

    #[instrument(skip(self, token, artist_ids), fields(batch = artist_ids.len()))]
    async fn artist_genres(
        &self,
        token: &str,
        artist_ids: &[String],
    ) -> CatalogResult<HashMap<String, Vec<String>>> {
        if artist_ids.is_empty() {
            return Ok(HashMap::new());
        }
        if artist_ids.len() > MAX_ARTIST_IDS {
            return Err(CatalogError::InvalidInput(format!(
                "at most {} artist ids per lookup, got {}",
                MAX_ARTIST_IDS,
                artist_ids.len()
            )));
        }

        let ids = artist_ids.join(",");
        let response = self
            .with_retry(|| async {
                self.execute(
                    self.request(Method::GET, "artists", token)
                        .query(&[("ids", ids.as_str())]),
                )
                .await
            })
            .await?;

        let parsed: ArtistsResponse = response.json().await.map_err(CatalogError::Http)?;
        Ok(parsed
            .artists
            .into_iter()
            .flatten()
            .map(|artist| (artist.id, artist.genres))
            .collect())
    }

    #[instrument(skip(self, token))]
    async fn clear_playlist(
        &self,
        token: &str,
        user_id: &str,
        playlist_id: &str,
    ) -> CatalogResult<()> {
        // Replacing with an empty list is idempotent, so it is safe to retry.
        self.with_retry(|| async {
            self.execute(
                self.request(
                    Method::PUT,
                    &format!("users/{}/playlists/{}/tracks", user_id, playlist_id),
                    token,
                )
                .json(&json!({ "ids": [] })),
            )
            .await
        })
        .await?;
        Ok(())
    }

    #[instrument(skip(self, token, track_ids), fields(batch = track_ids.len()))]
    async fn add_tracks(
        &self,
        token: &str,
        user_id: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> CatalogResult<()> {
        if track_ids.len() > MAX_ADD_IDS {
            return Err(CatalogError::InvalidInput(format!(
                "at most {} track ids per add, got {}",
                MAX_ADD_IDS,
                track_ids.len()
            )));
        }

        // Not retried: a duplicate append after an ambiguous failure would
        // corrupt the playlist order.
        self.execute(
            self.request(
                Method::POST,
                &format!("users/{}/playlists/{}/tracks", user_id, playlist_id),
                token,
            )
            .json(&json!({ "ids": track_ids })),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, token, description))]
    async fn set_playlist_description(
        &self,
        token: &str,
        playlist_id: &str,
        description: &str,
    ) -> CatalogResult<()> {
        self.execute(
            self.request(Method::PUT, &format!("playlists/{}", playlist_id), token)
                .json(&json!({ "description": description })),
        )
        .await?;
        Ok(())
    }
}
