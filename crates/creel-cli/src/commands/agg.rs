use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

use creel_core::feed::FeedFetcher;
use creel_core::scheduler::{IngestWorker, Scheduler};
use creel_core::storage::{Database, FeedRepository, PostRepository};
use creel_core::AppConfig;

pub async fn run(db: &Database, config: &AppConfig, interval_secs: Option<u64>) -> Result<()> {
    let interval_secs = interval_secs.unwrap_or(config.sync.fetch_interval_secs);

    let worker = IngestWorker::new(
        Arc::new(FeedRepository::new(db)),
        Arc::new(PostRepository::new(db)),
        FeedFetcher::new(config)?,
    );
    let scheduler = Scheduler::new(worker, Duration::from_secs(interval_secs));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("received interrupt, finishing the current cycle");
        let _ = shutdown_tx.send(true);
    });

    println!(
        "Collecting feeds every {} seconds. Press Ctrl+C to stop.",
        interval_secs
    );

    // Blocks until the shutdown signal lands between cycles
    scheduler.run(shutdown_rx).await;

    println!("Aggregation stopped.");

    Ok(())
}
