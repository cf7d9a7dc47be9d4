//! The curation pipeline and target-playlist write-back
//!
//! `curate` is read-only: fetch per ingredient, dedupe, filter, shuffle,
//! pin the tail. `sync_playlist` performs the mutations: clear the target,
//! add the curated ids back in order-preserving batches, then best-effort
//! refresh the description.

use std::collections::HashSet;

use mixtape_catalog_client::{Catalog, Track, MAX_ADD_IDS};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::curation::filter::FilterEngine;
use crate::curation::genres::resolve_genres;
use crate::error::{JobError, JobResult};
use crate::models::{Credential, Job};

/// Random facts rotated into the target playlist's description
const DESCRIPTION_FACTS: &[&str] = &[
    "A single violin contains over 70 separate pieces of wood.",
    "The longest officially released song runs for over 13 hours.",
    "Cows produce more milk when listening to slow music.",
    "The British Navy uses Britney Spears songs to scare off pirates.",
    "A composition exists that is scheduled to play for 639 years.",
    "Astronaut Chris Hadfield recorded an album entirely in space.",
    "The world's oldest known melody is over 3,400 years old.",
    "Finland has more metal bands per capita than any other country.",
    "The shortest song ever released lasts 1.316 seconds.",
    "Mozart wrote his first symphony at eight years old.",
    "A piano has around 230 strings under about 18 tons of tension.",
    "Plants grow faster when exposed to music between 115 and 250 Hz.",
];

/// Result of one successful write-back
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Curated ids written to the target playlist
    pub tracks_written: usize,
    /// Error text when the best-effort description update failed
    pub description_error: Option<String>,
}

/// Run the curation pipeline for one job, returning the ordered id list
///
/// Read-only: the only side effects are the source fetches and genre
/// lookups. Shuffling is intentionally unseeded in production so repeat
/// runs produce a fresh order; tests inject a seeded rng.
pub async fn curate<R: Rng + ?Sized>(
    job: &Job,
    catalog: &dyn Catalog,
    credential: &Credential,
    rng: &mut R,
) -> JobResult<Vec<String>> {
    let token = &credential.access_token;

    // Concatenate ingredient fetches in recipe order
    let mut candidates: Vec<Track> = Vec::new();
    for ingredient in &job.recipe {
        if ingredient.quantity == 0 {
            continue;
        }
        let tracks = catalog
            .playlist_tracks(token, &ingredient.source.id, ingredient.quantity)
            .await?;
        debug!(
            source = %ingredient.source.id,
            requested = ingredient.quantity,
            fetched = tracks.len(),
            "Fetched ingredient"
        );
        candidates.extend(tracks);
    }

    // Dedupe by track id, first occurrence wins; id-less tracks are
    // local/unavailable and dropped outright
    let mut seen = HashSet::new();
    let candidates: Vec<Track> = candidates
        .into_iter()
        .filter(|t| match &t.id {
            Some(id) => seen.insert(id.clone()),
            None => false,
        })
        .collect();

    let genres = resolve_genres(catalog, token, &candidates).await?;

    let filter = FilterEngine::new(job);
    let mut kept: Vec<String> = Vec::with_capacity(candidates.len());
    for track in &candidates {
        let track_id = track.id.as_deref().unwrap_or_default();
        let artist_genres = track
            .artist_id
            .as_deref()
            .and_then(|id| genres.get(id))
            .map(|g| g.as_slice());
        if filter.is_banned(track, artist_genres) {
            debug!(track_id = %track_id, track = %track.name, "Dropped banned track");
            continue;
        }
        kept.push(track_id.to_string());
    }

    kept.shuffle(rng);

    // Pinned tail tracks keep their configured order and skip the filter
    kept.extend(job.pinned_tail.iter().cloned());

    info!(
        job_id = %job.id,
        candidates = seen.len(),
        curated = kept.len(),
        "Curated track list"
    );
    Ok(kept)
}

/// Curate and write the result back to the job's target playlist
///
/// The target is cleared and the curated ids are re-added in batches of at
/// most [`MAX_ADD_IDS`], in increasing batch order. The closing description
/// update is best-effort: a failure there is reported on the [`SyncReport`]
/// but never fails the job.
pub async fn sync_playlist<R: Rng + ?Sized>(
    job: &Job,
    catalog: &dyn Catalog,
    credential: &Credential,
    rng: &mut R,
) -> JobResult<SyncReport> {
    let track_ids = curate(job, catalog, credential, rng).await?;

    let token = &credential.access_token;
    let playlist_id = &job.target_playlist.id;

    catalog
        .clear_playlist(token, &job.user_id, playlist_id)
        .await?;

    for batch in track_ids.chunks(MAX_ADD_IDS) {
        catalog
            .add_tracks(token, &job.user_id, playlist_id, batch)
            .await?;
    }

    let description = pick_description(rng);
    let description_error = match catalog
        .set_playlist_description(token, playlist_id, description)
        .await
    {
        Ok(()) => None,
        Err(e) => {
            let err = JobError::PartialWrite(e.to_string());
            warn!(job_id = %job.id, error = %err, "Continuing despite description failure");
            Some(e.to_string())
        }
    };

    info!(
        job_id = %job.id,
        playlist_id = %playlist_id,
        tracks = track_ids.len(),
        "Playlist write-back complete"
    );
    Ok(SyncReport {
        tracks_written: track_ids.len(),
        description_error,
    })
}

/// Pick a random fact for the playlist description
fn pick_description<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    DESCRIPTION_FACTS
        .choose(rng)
        .copied()
        .unwrap_or("Refreshed by Mixtape.")
}
