use crate::domain::{Media, Spot, SpotId};
use crate::keys;
use crate::planes::data::SpotCache;
use crate::ports::SpotSource;
use async_trait::async_trait;
use shared::Result;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Read-through decorator: serves from the cache and falls back to the wrapped
/// source on a miss, caching what it fetched.
///
/// Source errors are returned as-is and nothing is cached for them. Concurrent
/// misses on one key may each hit the source.
pub struct CachedSpotSource<S: SpotSource> {
    source: Arc<S>,
    cache: SpotCache,
}

impl<S: SpotSource> CachedSpotSource<S> {
    pub fn new(source: Arc<S>, cache: SpotCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &SpotCache {
        &self.cache
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }
}

#[async_trait]
impl<S: SpotSource> SpotSource for CachedSpotSource<S> {
    async fn spot(&self, id: SpotId) -> Result<Option<Spot>> {
        if let Some(spot) = self.cache.get_entity(id) {
            return Ok(Some(spot));
        }

        debug!(spot_id = %id, "spot cache miss, fetching");
        let fetched = self.source.spot(id).await?;
        // absent spots are not cached
        self.cache.set_entity(fetched.clone(), None);
        Ok(fetched)
    }

    async fn spots_within(&self, latitude: f64, longitude: f64, radius_km: f64) -> Result<Vec<Spot>> {
        if let Some(spots) = self.cache.cached_area(latitude, longitude, radius_km) {
            return Ok(spots);
        }

        debug!(latitude, longitude, radius_km, "area cache miss, fetching");
        let spots = self
            .source
            .spots_within(latitude, longitude, radius_km)
            .await?;
        self.cache
            .set_area(latitude, longitude, radius_km, spots.clone(), None);
        Ok(spots)
    }

    async fn media_for(&self, spot_id: SpotId) -> Result<Vec<Media>> {
        let ttl = self.cache.settings().media_ttl;
        self.cache
            .store()
            .get_or_set_with(
                &keys::media_key(spot_id),
                || self.source.media_for(spot_id),
                Some(ttl),
            )
            .await
    }
}

impl<S: SpotSource> Debug for CachedSpotSource<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedSpotSource")
            .field("cache", &self.cache)
            .finish()
    }
}
