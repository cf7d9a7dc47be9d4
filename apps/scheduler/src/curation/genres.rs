//! Genre resolution for a run's candidate tracks
//!
//! One batched catalog lookup per chunk of distinct primary-artist ids,
//! built fresh each run. Unresolvable artists stay absent from the map so
//! the run proceeds with unknown genres for them.

use std::collections::{HashMap, HashSet};

use mixtape_catalog_client::{Catalog, Track, MAX_ARTIST_IDS};
use tracing::debug;

use crate::error::JobResult;

/// Resolved genre sets keyed by artist id
pub type GenreMap = HashMap<String, Vec<String>>;

/// Resolve genres for every distinct primary artist in `tracks`
///
/// Each distinct artist id is looked up at most once per run, batched up
/// to the catalog's per-call limit.
pub async fn resolve_genres(
    catalog: &dyn Catalog,
    token: &str,
    tracks: &[Track],
) -> JobResult<GenreMap> {
    let mut seen = HashSet::new();
    let distinct: Vec<String> = tracks
        .iter()
        .filter_map(|t| t.artist_id.clone())
        .filter(|id| seen.insert(id.clone()))
        .collect();

    let mut genres = GenreMap::new();
    for batch in distinct.chunks(MAX_ARTIST_IDS) {
        genres.extend(catalog.artist_genres(token, batch).await?);
    }

    debug!(
        artists = distinct.len(),
        resolved = genres.len(),
        "Resolved artist genres"
    );
    Ok(genres)
}
