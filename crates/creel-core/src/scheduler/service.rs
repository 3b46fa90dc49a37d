use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use super::worker::IngestWorker;

/// Drives the ingest worker forever on a fixed cadence.
///
/// One cycle is in flight at a time; cycles never overlap. The shutdown
/// signal is only honored while waiting for the next tick, so a cycle that
/// has started always runs to completion and no feed is left mid-write.
pub struct Scheduler {
    worker: IngestWorker,
    interval: Duration,
}

impl Scheduler {
    pub fn new(worker: IngestWorker, interval: Duration) -> Self {
        Self { worker, interval }
    }

    /// Run cycles until the shutdown signal fires: once immediately, then
    /// every interval. An overrun cycle is followed by the next one as soon
    /// as it returns; missed ticks are not bursted to catch up.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "ingest scheduler started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Checked first so a pending shutdown wins over a due tick
                biased;
                changed = shutdown.changed() => {
                    // A closed channel means the other side is gone; stop too
                    if changed.is_err() || *shutdown.borrow() {
                        info!("ingest scheduler received shutdown signal");
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            // No cycle error is fatal: availability means ingestion keeps
            // running despite individual feed failures.
            if let Err(e) = self.worker.run_one_cycle().await {
                error!(error = %e, "ingest cycle failed");
            }
        }

        info!("ingest scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::feed::FeedFetcher;
    use crate::storage::{Database, FeedRepository, PostRepository};
    use std::sync::Arc;
    use tokio::time::timeout;

    async fn idle_scheduler(interval: Duration) -> Scheduler {
        let db = Database::new_in_memory().await.unwrap();
        let worker = IngestWorker::new(
            Arc::new(FeedRepository::new(&db)),
            Arc::new(PostRepository::new(&db)),
            FeedFetcher::new(&AppConfig::default()).unwrap(),
        );
        Scheduler::new(worker, interval)
    }

    #[tokio::test]
    async fn shutdown_signal_stops_the_loop() {
        let scheduler = idle_scheduler(Duration::from_secs(3600)).await;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(scheduler.run(shutdown_rx));

        // The first (immediate) cycle runs against an empty database, then
        // the loop sits in its wait, where the signal must land.
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();

        timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler did not stop after shutdown signal")
            .unwrap();
    }

    #[tokio::test]
    async fn dropped_sender_also_stops_the_loop() {
        let scheduler = idle_scheduler(Duration::from_secs(3600)).await;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(scheduler.run(shutdown_rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(shutdown_tx);

        timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler did not stop after sender was dropped")
            .unwrap();
    }
}
