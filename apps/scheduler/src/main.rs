use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mixtape_catalog_client::CatalogClient;
use mixtape_scheduler::store::{InMemoryCredentialStore, InMemoryJobStore};
use mixtape_scheduler::{Config, Scheduler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mixtape_scheduler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!(
        tick_interval_secs = config.tick_interval_secs,
        "Starting Mixtape scheduler"
    );

    let catalog = CatalogClient::with_timeout(
        &config.catalog_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let jobs = match &config.jobs_path {
        Some(path) => InMemoryJobStore::from_json_file(path)?,
        None => InMemoryJobStore::new(),
    };
    let credentials = InMemoryCredentialStore::new();

    let scheduler = Scheduler::new(Arc::new(catalog), Arc::new(jobs), Arc::new(credentials));

    let mut interval = tokio::time::interval(Duration::from_secs(config.tick_interval_secs));
    loop {
        interval.tick().await;
        let report = scheduler.run_tick(Utc::now()).await;
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Tick complete"
        );
    }
}
