//! Scheduler configuration loaded from environment variables
//!
//! Configuration is loaded from environment variables with defaults for
//! everything except the catalog base URL.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the catalog API
    pub catalog_base_url: String,

    /// Seconds between scheduler ticks
    pub tick_interval_secs: u64,

    /// Per-request catalog timeout in seconds
    pub request_timeout_secs: u64,

    /// Optional JSON document of jobs to seed the store with
    pub jobs_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            catalog_base_url: env::var("CATALOG_BASE_URL")
                .context("CATALOG_BASE_URL must be set")?,

            tick_interval_secs: env::var("TICK_INTERVAL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .context("Invalid TICK_INTERVAL_SECS value")?,

            request_timeout_secs: env::var("CATALOG_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid CATALOG_TIMEOUT_SECS value")?,

            jobs_path: env::var("JOBS_PATH").ok().map(PathBuf::from),
        })
    }
}
