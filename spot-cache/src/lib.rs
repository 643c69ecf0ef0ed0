//! Domain cache for spots, their media, and geographic area queries.
//!
//! Built on [`storage_engine::TtlStore`]. The data plane ([`SpotCache`] and the
//! read-through [`CachedSpotSource`]) translates entity operations into store
//! keys with per-namespace TTLs; the control plane handles cascading
//! invalidation and publishes [`InvalidationEvent`]s.

pub mod domain;
pub mod events;
pub mod keys;
pub mod planes;
pub mod ports;

pub use domain::{Media, MediaKind, Spot, SpotId, SpotType};
pub use events::InvalidationEvent;
pub use keys::AreaKey;
pub use planes::data::{CachedSpotSource, SpotCache};
pub use ports::SpotSource;
pub use shared::{CacheSettings, Error, Result};
