use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of store activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Raw entry count, including dead entries not yet reclaimed.
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Dead entries removed because a read observed them.
    pub expired_removed: u64,
    /// Dead entries removed by sweep passes.
    pub swept_removed: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    expired_removed: AtomicU64,
    swept_removed: AtomicU64,
}

impl Counters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn expired(&self) {
        self.expired_removed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn swept(&self, count: usize) {
        self.swept_removed.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, entries: usize) -> StoreStats {
        StoreStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired_removed: self.expired_removed.load(Ordering::Relaxed),
            swept_removed: self.swept_removed.load(Ordering::Relaxed),
        }
    }
}
