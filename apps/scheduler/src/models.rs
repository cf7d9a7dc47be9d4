//! Core data model: jobs, recipes, credentials, and the typed job patch

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{JobError, JobResult};

/// A playlist reference (id plus display name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
}

/// One weighted source-playlist contribution to a job's recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Source playlist to draw tracks from
    pub source: PlaylistRef,
    /// How many tracks this ingredient contributes; zero contributes
    /// nothing but stays in the configuration
    pub quantity: u32,
}

/// A rule banning tracks from curated output
///
/// Id rules match exactly; name, title and genre rules match
/// case-insensitively. Genre rules match on containment so a ban on
/// "metal" also covers "doom metal".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BanRule {
    TrackId(String),
    ArtistId(String),
    ArtistName(String),
    TrackTitle(String),
    Genre(String),
}

/// A configured recipe for regenerating one target playlist on a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    /// Owning user; every job belongs to exactly one user
    pub user_id: String,
    /// Playlist the curated output is written to
    pub target_playlist: PlaylistRef,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// UTC hour-of-day (0-23) the scheduler runs this job, or unset
    #[serde(default)]
    pub scheduled_time: Option<u8>,
    /// Ordered list of ingredients; unique by source playlist id
    #[serde(default)]
    pub recipe: Vec<Ingredient>,
    /// Enable the skit/interlude heuristics
    #[serde(default)]
    pub ban_skits: bool,
    #[serde(default)]
    pub bans: Vec<BanRule>,
    /// Track ids appended after the shuffled body, never shuffled or filtered
    #[serde(default)]
    pub pinned_tail: Vec<String>,
    /// Set only by the scheduler, on successful scheduled runs
    #[serde(default)]
    pub last_autorun: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a job with the minimal required fields
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, target: PlaylistRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            target_playlist: target,
            name: name.into(),
            description: None,
            scheduled_time: None,
            recipe: Vec::new(),
            ban_skits: false,
            bans: Vec::new(),
            pinned_tail: Vec::new(),
            last_autorun: None,
            last_updated: None,
        }
    }

    /// Validate configuration invariants, normalizing the recipe
    ///
    /// Duplicate recipe sources (same source playlist id) are dropped,
    /// keeping the first occurrence. This silent-skip is the documented
    /// policy for interactive edits.
    pub fn validate(&mut self) -> JobResult<()> {
        if let Some(hour) = self.scheduled_time {
            if hour > 23 {
                return Err(JobError::Validation(format!(
                    "scheduled_time must be an hour 0-23, got {}",
                    hour
                )));
            }
        }
        self.recipe = dedup_recipe(std::mem::take(&mut self.recipe));
        Ok(())
    }

    /// Apply a typed patch, enforcing the same invariants as `validate`
    pub fn apply_patch(&mut self, patch: JobPatch) -> JobResult<()> {
        if let Some(hour) = patch.scheduled_time.flatten() {
            if hour > 23 {
                return Err(JobError::Validation(format!(
                    "scheduled_time must be an hour 0-23, got {}",
                    hour
                )));
            }
        }

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(scheduled_time) = patch.scheduled_time {
            self.scheduled_time = scheduled_time;
        }
        if let Some(ban_skits) = patch.ban_skits {
            self.ban_skits = ban_skits;
        }
        if let Some(recipe) = patch.recipe {
            self.recipe = dedup_recipe(recipe);
        }
        if let Some(bans) = patch.bans {
            self.bans = bans;
        }
        if let Some(pinned_tail) = patch.pinned_tail {
            self.pinned_tail = pinned_tail;
        }
        self.last_updated = Some(Utc::now());
        Ok(())
    }
}

/// Drop recipe entries whose source playlist was already seen
fn dedup_recipe(recipe: Vec<Ingredient>) -> Vec<Ingredient> {
    let mut seen = std::collections::HashSet::new();
    let mut unique = Vec::with_capacity(recipe.len());
    for ingredient in recipe {
        if seen.insert(ingredient.source.id.clone()) {
            unique.push(ingredient);
        } else {
            warn!(
                source_playlist = %ingredient.source.id,
                "Duplicate recipe source, skipping"
            );
        }
    }
    unique
}

/// Closed update structure enumerating exactly the mutable job fields
///
/// Deserialization rejects unknown fields, so a malformed patch surfaces
/// as a validation error instead of being silently ignored.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Outer `None` leaves the schedule untouched; `Some(None)` unsets it
    #[serde(default, with = "double_option")]
    pub scheduled_time: Option<Option<u8>>,
    #[serde(default)]
    pub ban_skits: Option<bool>,
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
    #[serde(default)]
    pub bans: Option<Vec<BanRule>>,
    #[serde(default)]
    pub pinned_tail: Option<Vec<String>>,
}

impl JobPatch {
    /// Parse a patch from JSON, mapping unknown fields to a validation error
    pub fn from_json(value: serde_json::Value) -> JobResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| JobError::Validation(format!("invalid job patch: {}", e)))
    }
}

/// Serde helper distinguishing "field absent" from "field set to null"
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Per-user bearer credential for acting on the catalog API
///
/// Overwritten on every interactive login; the scheduler only ever reads it.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    pub user_id: String,
    pub access_token: String,
    pub refreshed_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
            refreshed_at: Utc::now(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .field("refreshed_at", &self.refreshed_at)
            .finish()
    }
}
