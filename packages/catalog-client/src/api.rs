//! The catalog collaborator contract
//!
//! The curation engine and scheduler only ever talk to the remote catalog
//! through this trait, so tests can substitute an in-process fake.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::Track;

/// Maximum number of track ids accepted by a single add call
pub const MAX_ADD_IDS: usize = 100;

/// Maximum number of artist ids accepted by a single genre lookup
pub const MAX_ARTIST_IDS: usize = 50;

/// Narrow interface over the external catalog/playlist API
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch up to `limit` tracks from a source playlist, in playlist order
    async fn playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        limit: u32,
    ) -> CatalogResult<Vec<Track>>;

    /// Resolve genre tags for a batch of artist ids (at most [`MAX_ARTIST_IDS`])
    ///
    /// Unresolvable artists are simply absent from the returned map.
    async fn artist_genres(
        &self,
        token: &str,
        artist_ids: &[String],
    ) -> CatalogResult<HashMap<String, Vec<String>>>;

    /// Remove every track from the target playlist
    async fn clear_playlist(
        &self,
        token: &str,
        user_id: &str,
        playlist_id: &str,
    ) -> CatalogResult<()>;

    /// Append up to [`MAX_ADD_IDS`] tracks to the target playlist, in order
    async fn add_tracks(
        &self,
        token: &str,
        user_id: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> CatalogResult<()>;

    /// Update the target playlist's description text
    async fn set_playlist_description(
        &self,
        token: &str,
        playlist_id: &str,
        description: &str,
    ) -> CatalogResult<()>;
}
