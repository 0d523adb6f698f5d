//! Auto-refresh leases.
//!
//! Polling is modeled as an owned lease, never as a detached timer:
//! acquiring the lease spawns the refresh task, dropping it aborts the task.
//! No timer can outlive the view that wanted the data.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::cache::ResourceKey;

use super::engine::SyncEngine;

/// Owned handle on a periodic refetch of one resource key.
pub struct RefreshLease {
    key: ResourceKey,
    handle: JoinHandle<()>,
}

impl RefreshLease {
    pub(crate) fn spawn(engine: Arc<SyncEngine>, key: ResourceKey, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // Delay, don't burst: a refetch slower than the interval pushes
            // the next tick out instead of stacking overlapping fetches.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; the caller just fetched.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                debug!(%key, "Auto-refresh tick");
                engine.refetch(key).await;
            }
        });
        debug!(%key, interval_secs = every.as_secs_f64(), "Refresh lease acquired");
        Self { key, handle }
    }

    pub fn key(&self) -> ResourceKey {
        self.key
    }

    /// Whether the background task is still running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for RefreshLease {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(key = %self.key, "Refresh lease released");
    }
}
