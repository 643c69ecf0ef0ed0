use crate::domain::{Media, Spot, SpotId};
use crate::events::InvalidationEvent;
use crate::keys::{self, AreaKey};
use shared::CacheSettings;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use storage_engine::TtlStore;
use tokio::sync::broadcast;
use tracing::trace;

/// Domain cache for spots, their media, and area query results.
///
/// Each namespace has its own default TTL from [`CacheSettings`]; every setter
/// accepts a per-call override where `None` means "use the namespace default".
/// Clones share the same underlying store.
#[derive(Clone)]
pub struct SpotCache {
    pub(crate) store: Arc<TtlStore>,
    pub(crate) settings: CacheSettings,
    pub(crate) events: broadcast::Sender<InvalidationEvent>,
}

impl SpotCache {
    /// Create a cache backed by a fresh store. The store's sweeper starts on
    /// the current Tokio runtime, if any.
    pub fn new(settings: CacheSettings) -> Self {
        let store = Arc::new(TtlStore::from_settings(&settings));
        Self::with_store(store, settings)
    }

    pub fn with_store(store: Arc<TtlStore>, settings: CacheSettings) -> Self {
        let (events, _) = broadcast::channel(settings.event_capacity);
        Self {
            store,
            settings,
            events,
        }
    }

    pub fn store(&self) -> &Arc<TtlStore> {
        &self.store
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    // ---- entity namespace ----

    pub fn get_entity(&self, id: SpotId) -> Option<Spot> {
        self.store.get::<Spot>(&keys::entity_key(id))
    }

    /// Cache a spot. Passing `None` is a no-op, so an absent lookup result is
    /// never recorded as a hit.
    pub fn set_entity(&self, spot: impl Into<Option<Spot>>, ttl: Option<Duration>) {
        let Some(spot) = spot.into() else {
            trace!("ignoring empty entity write");
            return;
        };
        let ttl = ttl.unwrap_or(self.settings.entity_ttl);
        self.store.set(keys::entity_key(spot.id), spot, Some(ttl));
    }

    pub fn remove_entity(&self, id: SpotId) {
        self.store.remove(&keys::entity_key(id));
    }

    // ---- area namespace ----

    /// Spots cached for the quantized window, or an empty list on a miss.
    ///
    /// A miss and a cached empty area look the same here.
    pub fn get_area(&self, latitude: f64, longitude: f64, radius_km: f64) -> Vec<Spot> {
        self.cached_area(latitude, longitude, radius_km)
            .unwrap_or_default()
    }

    /// Cache an area result and warm the entity cache with every spot in it,
    /// using the same TTL as the area entry.
    pub fn set_area(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        spots: Vec<Spot>,
        ttl: Option<Duration>,
    ) {
        let ttl = ttl.unwrap_or(self.settings.area_ttl);
        let key = AreaKey::new(latitude, longitude, radius_km).to_string();

        for spot in &spots {
            self.store
                .set(keys::entity_key(spot.id), spot.clone(), Some(ttl));
        }
        trace!(key = %key, spots = spots.len(), "caching area");
        self.store.set(key, spots, Some(ttl));
    }

    pub(crate) fn cached_area(&self, latitude: f64, longitude: f64, radius_km: f64) -> Option<Vec<Spot>> {
        self.store
            .get::<Vec<Spot>>(&keys::area_key(latitude, longitude, radius_km))
    }

    // ---- media namespace ----

    /// Media for a spot in cached order, or an empty list on a miss.
    pub fn get_media(&self, id: SpotId) -> Vec<Media> {
        self.store
            .get::<Vec<Media>>(&keys::media_key(id))
            .unwrap_or_default()
    }

    pub fn set_media(&self, id: SpotId, media: Vec<Media>, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.settings.media_ttl);
        self.store.set(keys::media_key(id), media, Some(ttl));
    }

    pub fn remove_media(&self, id: SpotId) {
        self.store.remove(&keys::media_key(id));
    }
}

impl Debug for SpotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotCache")
            .field("store", &self.store)
            .field("settings", &self.settings)
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}
