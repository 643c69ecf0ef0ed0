//! Background reclamation of dead entries.
//!
//! The sweeper is a memory optimization only: reads never depend on it having
//! run, because every read removes the dead entry it observes. A pass collects
//! dead keys one shard at a time and then removes them in small batches, so no
//! lock is held across the full scan.

use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::ttl_store::Shared;

/// Keys removed per batch before the next shard lock is taken.
pub const SWEEP_BATCH_SIZE: usize = 256;

/// Runs one sweep pass and returns the number of entries removed.
pub(crate) fn sweep_pass(shared: &Shared) -> usize {
    let now = Instant::now();

    let dead: Vec<String> = shared
        .entries
        .iter()
        .filter(|entry| !entry.value().is_live_at(now))
        .map(|entry| entry.key().clone())
        .collect();

    let mut removed = 0;
    for batch in dead.chunks(SWEEP_BATCH_SIZE) {
        for key in batch {
            // re-check: the key may have been refreshed since collection
            if shared
                .entries
                .remove_if(key, |_, entry| !entry.is_live_at(now))
                .is_some()
            {
                removed += 1;
            }
        }
    }

    shared.counters.swept(removed);
    removed
}

/// Owns the background sweep task of one store.
#[derive(Debug)]
pub(crate) struct Sweeper {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl Sweeper {
    pub(crate) fn spawn(shared: Weak<Shared>, interval: Duration, handle: &Handle) -> Self {
        let shutdown = CancellationToken::new();
        let task = handle.spawn(run(shared, interval, shutdown.clone()));
        Self { shutdown, task }
    }

    pub(crate) fn stop(&self) {
        if !self.shutdown.is_cancelled() {
            self.shutdown.cancel();
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled() && !self.task.is_finished()
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(shared: Weak<Shared>, period: Duration, shutdown: CancellationToken) {
    info!(interval_secs = period.as_secs(), "cache sweeper starting");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Skip the first immediate tick
    interval.tick().await;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!("cache sweeper shutting down");
                break;
            }

            _ = interval.tick() => {
                let Some(shared) = shared.upgrade() else {
                    debug!("store dropped, cache sweeper exiting");
                    break;
                };
                let started = Instant::now();
                let removed = sweep_pass(&shared);
                debug!(
                    removed,
                    remaining = shared.entries.len(),
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "sweep pass complete"
                );
            }
        }
    }
}
