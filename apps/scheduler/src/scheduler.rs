//! The job scheduler
//!
//! One `run_tick` evaluates every configured job against the current UTC
//! hour and drives the curation pipeline for the due ones. Failures are
//! recorded per job; a tick never aborts because one job failed.

use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use mixtape_catalog_client::Catalog;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::curation::{sync_playlist, SyncReport};
use crate::error::{JobError, JobResult};
use crate::models::{Credential, Job};
use crate::store::{SharedCredentialStore, SharedJobStore};

/// Outcome of one job within one tick; terminal for that tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scheduled hour did not match; not an error
    Skipped,
    Success,
    Failed(String),
}

/// Per-job entry in a tick report
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub job_id: Uuid,
    pub user_id: String,
    pub job_name: String,
    pub outcome: TickOutcome,
}

/// Report for one scheduler tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<JobOutcome>,
}

impl TickReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, TickOutcome::Success))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TickOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TickOutcome::Skipped))
    }

    fn count(&self, pred: impl Fn(&TickOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }
}

/// Drives configured jobs through the curation engine
pub struct Scheduler {
    catalog: Arc<dyn Catalog>,
    jobs: SharedJobStore,
    credentials: SharedCredentialStore,
    rng: Mutex<StdRng>,
}

impl Scheduler {
    /// Create a scheduler with an entropy-seeded rng (production)
    pub fn new(
        catalog: Arc<dyn Catalog>,
        jobs: SharedJobStore,
        credentials: SharedCredentialStore,
    ) -> Self {
        Self::with_rng(catalog, jobs, credentials, StdRng::from_entropy())
    }

    /// Create a scheduler with an injected rng (deterministic tests)
    pub fn with_rng(
        catalog: Arc<dyn Catalog>,
        jobs: SharedJobStore,
        credentials: SharedCredentialStore,
        rng: StdRng,
    ) -> Self {
        Self {
            catalog,
            jobs,
            credentials,
            rng: Mutex::new(rng),
        }
    }

    /// Evaluate every configured job against the current hour
    ///
    /// Jobs whose scheduled hour matches are run; `last_autorun` is
    /// persisted only on success. Every failure is caught and recorded
    /// against that job alone.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> TickReport {
        let current_hour = now.hour() as u8;
        let jobs = self.jobs.load_jobs().await;
        info!(current_hour, jobs = jobs.len(), "Scheduler tick");

        let mut outcomes = Vec::with_capacity(jobs.len());
        for mut job in jobs {
            let outcome = if job.scheduled_time == Some(current_hour) {
                match self.run_scheduled_job(&job).await {
                    Ok(report) => {
                        job.last_autorun = Some(now);
                        self.jobs.save_job(job.clone()).await;
                        info!(
                            job_id = %job.id,
                            user_id = %job.user_id,
                            tracks = report.tracks_written,
                            "Job processed"
                        );
                        TickOutcome::Success
                    }
                    Err(e) => {
                        error!(
                            job_id = %job.id,
                            user_id = %job.user_id,
                            kind = e.kind(),
                            error = %e,
                            "Job failed"
                        );
                        TickOutcome::Failed(e.to_string())
                    }
                }
            } else {
                debug!(
                    job_id = %job.id,
                    scheduled = ?job.scheduled_time,
                    current_hour,
                    "Skipping job, hour mismatch"
                );
                TickOutcome::Skipped
            };

            outcomes.push(JobOutcome {
                job_id: job.id,
                user_id: job.user_id.clone(),
                job_name: job.name.clone(),
                outcome,
            });
        }

        TickReport {
            started_at: now,
            outcomes,
        }
    }

    /// Run one job immediately, bypassing the hour check
    ///
    /// The supplied credential is stored as the user's latest before the
    /// run, mirroring an interactive login. Success or structured failure
    /// is surfaced directly to the caller; nothing is recorded silently.
    pub async fn process_now(
        &self,
        job_id: Uuid,
        user_id: &str,
        credential: Credential,
    ) -> JobResult<SyncReport> {
        self.credentials.put(credential.clone()).await;

        let job = self
            .jobs
            .find_job(job_id, user_id)
            .await
            .ok_or_else(|| JobError::NotFound(format!("job {} for user {}", job_id, user_id)))?;

        let mut rng = self.fork_rng().await;
        sync_playlist(&job, self.catalog.as_ref(), &credential, &mut rng).await
    }

    async fn run_scheduled_job(&self, job: &Job) -> JobResult<SyncReport> {
        let credential = self
            .credentials
            .get(&job.user_id)
            .await
            .ok_or_else(|| JobError::Auth(format!("no credential for user {}", job.user_id)))?;

        let mut rng = self.fork_rng().await;
        sync_playlist(job, self.catalog.as_ref(), &credential, &mut rng).await
    }

    /// Fork a per-run rng from the shared seed source
    ///
    /// The shared rng is locked only long enough to draw a seed; catalog
    /// I/O never runs under it, so concurrent runs for unrelated users do
    /// not serialize on each other.
    async fn fork_rng(&self) -> StdRng {
        let mut guard = self.rng.lock().await;
        StdRng::seed_from_u64(guard.gen())
    }
}
