//! Per-track ban decisions
//!
//! First match wins: explicit ban rules, then genre rules, then the
//! skit/interlude heuristics when the job enables them. A track whose
//! artist has no resolvable genres is never dropped by genre rules alone.

use mixtape_catalog_client::Track;

use crate::models::{BanRule, Job};

/// Tracks shorter than this are treated as skits when `ban_skits` is set
pub const SHORT_TRACK_MS: u32 = 90_000;

/// Speechiness at or above this marks a track as spoken word
pub const SKIT_SPEECHINESS: f32 = 0.9;

/// Spoken word is only flagged at or below this instrumentalness
pub const SKIT_MAX_INSTRUMENTALNESS: f32 = 0.5;

/// Title substrings marking interstitial tracks
const SKIT_TITLE_MARKERS: &[&str] = &["skit", "interlude"];

/// Evaluates one job's ban rules against candidate tracks
pub struct FilterEngine<'a> {
    bans: &'a [BanRule],
    ban_skits: bool,
}

impl<'a> FilterEngine<'a> {
    pub fn new(job: &'a Job) -> Self {
        Self {
            bans: &job.bans,
            ban_skits: job.ban_skits,
        }
    }

    /// Decide whether a candidate track is banned
    ///
    /// `genres` is the resolved genre set for the track's primary artist,
    /// `None` when the artist could not be resolved.
    pub fn is_banned(&self, track: &Track, genres: Option<&[String]>) -> bool {
        if self.matches_ban_rule(track) {
            return true;
        }
        if let Some(genres) = genres {
            if self.matches_genre_rule(genres) {
                return true;
            }
        }
        self.ban_skits && is_skit(track)
    }

    fn matches_ban_rule(&self, track: &Track) -> bool {
        self.bans.iter().any(|rule| match rule {
            BanRule::TrackId(id) => track.id.as_deref() == Some(id.as_str()),
            BanRule::ArtistId(id) => track.artist_id.as_deref() == Some(id.as_str()),
            BanRule::ArtistName(name) => track
                .artist_name
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(name)),
            BanRule::TrackTitle(title) => track.name.eq_ignore_ascii_case(title),
            BanRule::Genre(_) => false,
        })
    }

    fn matches_genre_rule(&self, genres: &[String]) -> bool {
        self.bans.iter().any(|rule| match rule {
            BanRule::Genre(banned) => {
                let banned = banned.to_lowercase();
                genres.iter().any(|g| g.to_lowercase().contains(&banned))
            }
            _ => false,
        })
    }
}

/// Skit/interlude heuristics: short duration, interstitial title, or a
/// spoken-word feature signal (high speechiness with low instrumentalness)
///
/// Missing duration or features are treated like missing genres: absence
/// of data never bans a track.
fn is_skit(track: &Track) -> bool {
    if track.duration_ms.is_some_and(|d| d < SHORT_TRACK_MS) {
        return true;
    }
    let title = track.name.to_lowercase();
    if SKIT_TITLE_MARKERS.iter().any(|m| title.contains(m)) {
        return true;
    }
    let Some(features) = track.features else {
        return false;
    };
    features.speechiness.is_some_and(|s| s >= SKIT_SPEECHINESS)
        && features.instrumentalness.unwrap_or(0.0) <= SKIT_MAX_INSTRUMENTALNESS
}
