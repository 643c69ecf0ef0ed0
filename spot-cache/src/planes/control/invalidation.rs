//! Invalidation coordinator.
//!
//! Write paths call these after a successful change to the backing store.
//! `invalidate_entity` cascades to the spot's media but not to area entries:
//! there is no index from a spot to the areas that contain it, so an area entry
//! can keep serving an outdated copy of a changed spot until its TTL lapses.

use crate::domain::SpotId;
use crate::events::{
    now_timestamp_ms, AreaInvalidatedEvent, ClearedEvent, InvalidationEvent, SpotInvalidatedEvent,
};
use crate::keys::{self, AreaKey};
use crate::planes::data::SpotCache;
use tokio::sync::broadcast;
use tracing::{debug, trace};

impl SpotCache {
    /// Remove the spot's entity and media entries.
    pub fn invalidate_entity(&self, id: SpotId) {
        let entity_key = keys::entity_key(id);
        let media_key = keys::media_key(id);
        self.store.remove(&entity_key);
        self.store.remove(&media_key);
        debug!(spot_id = %id, "invalidated spot and media");

        self.publish(InvalidationEvent::SpotInvalidated(SpotInvalidatedEvent {
            spot_id: id,
            keys: vec![entity_key, media_key],
            timestamp: now_timestamp_ms(),
        }));
    }

    /// Remove exactly the area entry whose quantized key matches the triple.
    pub fn invalidate_area(&self, latitude: f64, longitude: f64, radius_km: f64) {
        let key = AreaKey::new(latitude, longitude, radius_km).to_string();
        self.store.remove(&key);
        debug!(key = %key, "invalidated area");

        self.publish(InvalidationEvent::AreaInvalidated(AreaInvalidatedEvent {
            key,
            timestamp: now_timestamp_ms(),
        }));
    }

    /// Drop every cached entry in every namespace.
    pub fn clear_all(&self) {
        self.store.clear();
        debug!("cleared spot cache");

        self.publish(InvalidationEvent::Cleared(ClearedEvent {
            timestamp: now_timestamp_ms(),
        }));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InvalidationEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: InvalidationEvent) {
        match self.events.send(event) {
            Ok(subscriber_count) => {
                trace!(subscriber_count, "broadcasted invalidation event");
            }
            Err(_) => {
                trace!("no subscribers for invalidation event");
            }
        }
    }
}
