//! Error taxonomy for job processing
//!
//! Interactive calls surface these directly; scheduled ticks catch them
//! per job and record them without aborting the tick.

use mixtape_catalog_client::CatalogError;
use thiserror::Error;

/// Job processing errors
#[derive(Error, Debug)]
pub enum JobError {
    /// Missing or invalid credential for the owning user
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The catalog API was unreachable, timed out, or rate limited
    #[error("catalog unavailable: {0}")]
    RemoteUnavailable(String),

    /// Job or playlist missing
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed job or ingredient configuration
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// Description update failed after the track write-back succeeded
    ///
    /// Non-fatal: logged, never escalated to a job failure.
    #[error("description update failed after write-back: {0}")]
    PartialWrite(String),
}

impl JobError {
    /// Short machine-readable kind, for structured logs and API surfaces
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::RemoteUnavailable(_) => "remote_unavailable",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::PartialWrite(_) => "partial_write",
        }
    }

    /// Whether a later tick could plausibly succeed without operator action
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RemoteUnavailable(_))
    }
}

impl From<CatalogError> for JobError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::Timeout | CatalogError::RateLimited => {
                Self::RemoteUnavailable(err.to_string())
            }
            CatalogError::Api { status: 401, .. } | CatalogError::Api { status: 403, .. } => {
                Self::Auth(err.to_string())
            }
            CatalogError::Api { status: 404, .. } => Self::NotFound(err.to_string()),
            CatalogError::InvalidInput(msg) => Self::Validation(msg.clone()),
            _ => Self::RemoteUnavailable(err.to_string()),
        }
    }
}

/// Result type alias for job processing
pub type JobResult<T> = Result<T, JobError>;
