use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, instrument};

use super::coordinator::SyncCoordinator;

/// Configuration for the periodic reconciliation task
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How often memory and the local store are reconciled
    pub sync_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_secs(30),
        }
    }
}

/// Starts the background task that periodically reconciles the session with
/// the local store and backup
#[instrument(skip(coordinator))]
pub async fn start_sync_task(coordinator: Arc<SyncCoordinator>, config: SyncConfig) {
    info!(
        sync_interval_secs = config.sync_interval.as_secs(),
        "Starting periodic sync task"
    );

    let mut sync_interval = interval(config.sync_interval);
    sync_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately and the session was just loaded
    sync_interval.tick().await;

    loop {
        sync_interval.tick().await;

        debug!("Running periodic sync");

        match coordinator.reconcile().await {
            Ok(outcome) => {
                debug!(
                    reloaded_from_local = outcome.reloaded_from_local,
                    persisted = outcome.persisted,
                    "Periodic sync completed"
                );
            }
            Err(e) => {
                error!(error = %e, "Periodic sync failed");
            }
        }
    }
}
