//! Job and credential repositories
//!
//! The scheduler and curation engine only see these traits; the in-memory
//! implementations back the service, optionally seeded from a JSON document
//! at startup.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::error::{JobError, JobResult};
use crate::models::{Credential, Job};

/// Repository of configured jobs
#[async_trait]
pub trait JobStore: Send + Sync {
    /// All configured jobs, across every user
    async fn load_jobs(&self) -> Vec<Job>;

    /// Find one job scoped to its owning user
    async fn find_job(&self, job_id: Uuid, user_id: &str) -> Option<Job>;

    /// Persist a job (insert or overwrite)
    async fn save_job(&self, job: Job);
}

/// Repository of per-user catalog credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Option<Credential>;

    /// Store the latest credential, overwriting any previous one
    async fn put(&self, credential: Credential);
}

/// In-memory job store
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: DashMap<Uuid, Job>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with validated jobs
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        let store = Self::new();
        for job in jobs {
            store.jobs.insert(job.id, job);
        }
        store
    }

    /// Load jobs from a JSON document (an array of jobs)
    ///
    /// Every job is validated; a malformed document or job is a
    /// configuration error, not a partial load.
    pub fn from_json_file(path: impl AsRef<Path>) -> JobResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            JobError::Validation(format!("cannot read jobs file {}: {}", path.display(), e))
        })?;
        let mut jobs: Vec<Job> = serde_json::from_str(&raw).map_err(|e| {
            JobError::Validation(format!("malformed jobs file {}: {}", path.display(), e))
        })?;
        for job in &mut jobs {
            job.validate()?;
        }
        info!(count = jobs.len(), path = %path.display(), "Loaded jobs");
        Ok(Self::with_jobs(jobs))
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn load_jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.iter().map(|entry| entry.value().clone()).collect();
        // DashMap iteration order is arbitrary; keep reports stable
        jobs.sort_by_key(|job| job.id);
        jobs
    }

    async fn find_job(&self, job_id: Uuid, user_id: &str) -> Option<Job> {
        self.jobs
            .get(&job_id)
            .filter(|job| job.user_id == user_id)
            .map(|job| job.clone())
    }

    async fn save_job(&self, job: Job) {
        self.jobs.insert(job.id, job);
    }
}

/// In-memory credential store
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credentials: DashMap<String, Credential>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, user_id: &str) -> Option<Credential> {
        self.credentials.get(user_id).map(|c| c.clone())
    }

    async fn put(&self, credential: Credential) {
        self.credentials
            .insert(credential.user_id.clone(), credential);
    }
}

/// Convenience aliases for injected repositories
pub type SharedJobStore = Arc<dyn JobStore>;
pub type SharedCredentialStore = Arc<dyn CredentialStore>;
