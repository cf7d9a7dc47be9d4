//! Catalog API response models

use serde::{Deserialize, Serialize};

/// A track as returned by the catalog
///
/// Identity is the catalog id; tracks that are local/unavailable come back
/// with no id and are dropped before curation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Catalog track id (absent for local/unavailable tracks)
    pub id: Option<String>,
    /// Track title
    pub name: String,
    /// Duration in milliseconds, when the catalog reports one
    pub duration_ms: Option<u32>,
    /// Primary artist catalog id
    pub artist_id: Option<String>,
    /// Primary artist display name
    pub artist_name: Option<String>,
    /// Inline audio-feature signals, when the catalog provides them
    pub features: Option<AudioFeatures>,
}

/// Audio-feature signals used by the skit/interlude heuristics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AudioFeatures {
    /// 0.0..=1.0, high values indicate spoken word
    pub speechiness: Option<f32>,
    /// 0.0..=1.0, low values indicate vocal content
    pub instrumentalness: Option<f32>,
}

// Internal response types for deserialization

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistTracksResponse {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    /// Null for entries the catalog can no longer resolve
    pub track: Option<RawTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTrack {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub duration_ms: Option<u32>,
    #[serde(default)]
    pub artists: Vec<RawArtistRef>,
    #[serde(default)]
    pub features: Option<AudioFeatures>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtistRef {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

impl From<RawTrack> for Track {
    fn from(raw: RawTrack) -> Self {
        let primary = raw.artists.into_iter().next();
        Self {
            id: raw.id.filter(|s| !s.is_empty()),
            name: raw.name,
            duration_ms: raw.duration_ms,
            artist_id: primary.as_ref().and_then(|a| a.id.clone()),
            artist_name: primary.map(|a| a.name),
            features: raw.features,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistsResponse {
    /// Entries are null for ids the catalog could not resolve
    pub artists: Vec<Option<RawArtist>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtist {
    pub id: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Catalog API error response body
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
