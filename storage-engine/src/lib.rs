//! Generic in-memory TTL store.
//!
//! [`TtlStore`] maps string keys to values of any `Send + Sync` type, each with
//! its own absolute expiry. Expired entries are removed lazily on read and
//! periodically by a background sweeper owned by the store.

mod entry;
mod stats;
mod sweeper;
mod ttl_store;

pub use entry::CacheEntry;
pub use stats::StoreStats;
pub use sweeper::SWEEP_BATCH_SIZE;
pub use ttl_store::TtlStore;
