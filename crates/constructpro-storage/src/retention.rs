use crate::local::LocalStorageProvider;
use crate::traits::StorageResult;
use constructpro_core::RetentionConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

/// Periodic retention sweep over the local media tree.
///
/// Holds no state of its own beyond the schedule; every run is a call to
/// `LocalStorageProvider::cleanup_older_than`. Only one sweeper should run per
/// upload root.
#[derive(Clone)]
pub struct RetentionSweeper {
    storage: Arc<LocalStorageProvider>,
    retention_days: u32,
    interval: Duration,
}

impl RetentionSweeper {
    pub fn new(storage: Arc<LocalStorageProvider>, config: &RetentionConfig) -> Self {
        Self {
            storage,
            retention_days: config.days,
            interval: Duration::from_secs(config.interval_secs.max(1)),
        }
    }

    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    /// Sweep once. Returns the number of files removed.
    #[tracing::instrument(skip(self), fields(retention.days = self.retention_days))]
    pub async fn run_once(&self) -> StorageResult<usize> {
        self.storage.cleanup_older_than(self.retention_days).await
    }

    /// Start the background sweep, first run immediately, then on every interval tick
    /// Returns a JoinHandle for graceful shutdown
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(self.interval);

            loop {
                sweep_interval.tick().await;

                tracing::info!("Starting scheduled retention sweep");

                match self.run_once().await {
                    Ok(deleted) => {
                        tracing::info!(deleted, "Retention sweep completed successfully");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Retention sweep failed");
                    }
                }
            }
        })
    }
}
