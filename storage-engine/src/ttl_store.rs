use crate::entry::CacheEntry;
use crate::stats::{Counters, StoreStats};
use crate::sweeper::{Sweeper, sweep_pass};
use dashmap::DashMap;
use shared::CacheSettings;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// State shared between a store and its sweeper.
#[derive(Default)]
pub(crate) struct Shared {
    pub(crate) entries: DashMap<String, CacheEntry>,
    pub(crate) counters: Counters,
}

enum Lookup<V> {
    Missing,
    Dead,
    Live(Option<V>),
}

/// Process-local, concurrency-safe key/value store with per-entry expiry.
///
/// Dead entries are never returned: a read that observes one removes it, and a
/// background sweeper reclaims the rest on a fixed interval. Writes are
/// last-writer-wins per key; there is no cross-key atomicity.
pub struct TtlStore {
    shared: Arc<Shared>,
    sweeper: Option<Sweeper>,
    sweep_interval: Duration,
}

impl TtlStore {
    /// Create a store and start its sweeper on the current Tokio runtime.
    ///
    /// Outside a runtime the store still works, relying on lazy deletion only.
    pub fn new(sweep_interval: Duration) -> Self {
        match Handle::try_current() {
            Ok(handle) => Self::with_handle(sweep_interval, &handle),
            Err(_) => {
                warn!("no Tokio runtime available, cache sweeper disabled");
                Self::build(sweep_interval, None)
            }
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.sweep_interval)
    }

    /// Create a store whose sweeper runs on the given runtime.
    pub fn with_handle(sweep_interval: Duration, handle: &Handle) -> Self {
        Self::build(sweep_interval, Some(handle))
    }

    /// Create a store that never sweeps; dead entries go away only when read.
    pub fn without_sweeper() -> Self {
        Self::build(CacheSettings::DEFAULT_SWEEP_INTERVAL, None)
    }

    fn build(sweep_interval: Duration, handle: Option<&Handle>) -> Self {
        let shared = Arc::new(Shared::default());
        let handle = match handle {
            Some(_) if sweep_interval.is_zero() => {
                warn!("zero sweep interval, cache sweeper disabled");
                None
            }
            handle => handle,
        };
        let sweeper = handle
            .map(|handle| Sweeper::spawn(Arc::downgrade(&shared), sweep_interval, handle));
        Self {
            shared,
            sweeper,
            sweep_interval,
        }
    }

    /// Get a live value. Dead entries are removed as a side effect.
    ///
    /// A live entry holding a different type than `V` reads as a miss and is
    /// left in place.
    pub fn get<V>(&self, key: &str) -> Option<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();
        let lookup = match self.shared.entries.get_mut(key) {
            None => Lookup::Missing,
            Some(mut entry) if entry.is_live_at(now) => {
                entry.touch(now);
                Lookup::Live(entry.downcast::<V>())
            }
            Some(_) => Lookup::Dead,
        };

        match lookup {
            Lookup::Live(Some(value)) => {
                trace!(key, "cache hit");
                self.shared.counters.hit();
                Some(value)
            }
            Lookup::Live(None) => {
                trace!(key, expected = std::any::type_name::<V>(), "cache entry has another type");
                self.shared.counters.miss();
                None
            }
            Lookup::Dead => {
                self.remove_dead(key, now);
                self.shared.counters.miss();
                None
            }
            Lookup::Missing => {
                trace!(key, "cache miss");
                self.shared.counters.miss();
                None
            }
        }
    }

    /// Store `value` under `key`, replacing any existing entry.
    ///
    /// `ttl = None` means the entry never expires.
    pub fn set<V>(&self, key: impl Into<String>, value: V, ttl: Option<Duration>)
    where
        V: Send + Sync + 'static,
    {
        let entry = CacheEntry::new(Arc::new(value), ttl, Instant::now());
        self.shared.entries.insert(key.into(), entry);
    }

    /// Remove `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) {
        self.shared.entries.remove(key);
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.shared.entries.clear();
    }

    /// Whether `key` holds a live entry, with the same lazy removal as [`TtlStore::get`].
    pub fn exists(&self, key: &str) -> bool {
        let now = Instant::now();
        let lookup: Lookup<()> = match self.shared.entries.get_mut(key) {
            None => Lookup::Missing,
            Some(mut entry) if entry.is_live_at(now) => {
                entry.touch(now);
                Lookup::Live(Some(()))
            }
            Some(_) => Lookup::Dead,
        };

        match lookup {
            Lookup::Live(_) => true,
            Lookup::Dead => {
                self.remove_dead(key, now);
                false
            }
            Lookup::Missing => false,
        }
    }

    /// Return the live value for `key`, or populate it from `factory`.
    ///
    /// Concurrent misses are not de-duplicated: each may run `factory`, and the
    /// last write wins. A failing factory leaves the key untouched.
    pub fn get_or_set<V, E, F>(&self, key: &str, factory: F, ttl: Option<Duration>) -> Result<V, E>
    where
        V: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get::<V>(key) {
            return Ok(value);
        }

        let value = factory()?;
        self.set(key, value.clone(), ttl);
        Ok(value)
    }

    /// Async counterpart of [`TtlStore::get_or_set`]. No timeout is applied to the factory.
    pub async fn get_or_set_with<V, E, F, Fut>(
        &self,
        key: &str,
        factory: F,
        ttl: Option<Duration>,
    ) -> Result<V, E>
    where
        V: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get::<V>(key) {
            return Ok(value);
        }

        let value = factory().await?;
        self.set(key, value.clone(), ttl);
        Ok(value)
    }

    /// Snapshot of the live entry for `key` without touching it.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        let now = Instant::now();
        self.shared
            .entries
            .get(key)
            .filter(|entry| entry.is_live_at(now))
            .map(|entry| entry.value().clone())
    }

    /// Raw entry count, dead entries not yet reclaimed included.
    pub fn len(&self) -> usize {
        self.shared.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.entries.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        self.shared.counters.snapshot(self.shared.entries.len())
    }

    /// Run one sweep pass now and return how many dead entries it removed.
    pub fn sweep_expired(&self) -> usize {
        let removed = sweep_pass(&self.shared);
        debug!(removed, "manual sweep pass complete");
        removed
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper.as_ref().is_some_and(Sweeper::is_running)
    }

    /// Stop the background sweeper. Safe to call more than once.
    pub fn shutdown(&self) {
        if let Some(sweeper) = &self.sweeper {
            sweeper.stop();
        }
    }

    fn remove_dead(&self, key: &str, now: Instant) {
        // only remove if still dead: a concurrent set may have refreshed it
        if self
            .shared
            .entries
            .remove_if(key, |_, entry| !entry.is_live_at(now))
            .is_some()
        {
            debug!(key, "removed expired cache entry");
            self.shared.counters.expired();
        }
    }
}

impl Default for TtlStore {
    fn default() -> Self {
        Self::new(CacheSettings::DEFAULT_SWEEP_INTERVAL)
    }
}

impl Debug for TtlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlStore")
            .field("entry_count", &self.shared.entries.len())
            .field("sweep_interval", &self.sweep_interval)
            .field("sweeping", &self.is_sweeping())
            .finish()
    }
}
