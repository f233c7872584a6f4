use std::sync::Arc;
use tokio::time::{sleep, Duration};

use crate::services::github_sync::GitHubSyncService;

/// Runs the GitHub sync on a fixed interval.
///
/// Each run is awaited before the next sleep starts, so runs never overlap.
pub struct SyncScheduler {
    service: GitHubSyncService,
    username: String,
    interval: Duration,
}

impl SyncScheduler {
    pub fn new(service: GitHubSyncService, username: String, interval_minutes: u64) -> Self {
        Self {
            service,
            username,
            interval: Duration::from_secs(interval_minutes.max(1) * 60),
        }
    }

    /// Start the background scheduler
    pub async fn start(self: Arc<Self>) {
        log::info!(
            "Starting sync scheduler (every {} minutes, user {})",
            self.interval.as_secs() / 60,
            self.username
        );

        loop {
            if let Err(e) = self.service.run(&self.username).await {
                log::error!("Error in sync scheduler: {:#}", e);
            }

            sleep(self.interval).await;
        }
    }
}
