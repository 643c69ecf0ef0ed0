mod common;

use async_trait::async_trait;
use common::{fake_media, fake_spot, fake_spot_near, init_tracing};
use shared::{Error, Result};
use spot_cache::{CacheSettings, CachedSpotSource, Media, Spot, SpotCache, SpotId, SpotSource};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::time::advance;

/// In-memory backing store that counts how often it is queried.
#[derive(Default)]
struct CountingSource {
    spots: HashMap<SpotId, Spot>,
    media: HashMap<SpotId, Vec<Media>>,
    spot_calls: AtomicUsize,
    area_calls: AtomicUsize,
    media_calls: AtomicUsize,
    failing: AtomicBool,
}

impl CountingSource {
    fn with_spots(spots: Vec<Spot>) -> Self {
        let media = spots
            .iter()
            .map(|spot| (spot.id, fake_media(spot.id, 2)))
            .collect();
        Self {
            spots: spots.into_iter().map(|spot| (spot.id, spot)).collect(),
            media,
            ..Default::default()
        }
    }

    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(Error::Source("database unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SpotSource for CountingSource {
    async fn spot(&self, id: SpotId) -> Result<Option<Spot>> {
        self.spot_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.spots.get(&id).cloned())
    }

    async fn spots_within(&self, latitude: f64, longitude: f64, radius_km: f64) -> Result<Vec<Spot>> {
        self.area_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        // crude degree box, good enough for fixtures
        let span = radius_km / 111.0;
        let mut spots: Vec<Spot> = self
            .spots
            .values()
            .filter(|spot| {
                (spot.latitude - latitude).abs() <= span && (spot.longitude - longitude).abs() <= span
            })
            .cloned()
            .collect();
        spots.sort_by_key(|spot| spot.id);
        Ok(spots)
    }

    async fn media_for(&self, spot_id: SpotId) -> Result<Vec<Media>> {
        self.media_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.media.get(&spot_id).cloned().unwrap_or_default())
    }
}

fn reader(spots: Vec<Spot>) -> CachedSpotSource<CountingSource> {
    init_tracing();
    let cache = SpotCache::new(CacheSettings::default());
    CachedSpotSource::new(Arc::new(CountingSource::with_spots(spots)), cache)
}

#[tokio::test(start_paused = true)]
async fn test_spot_fetched_once_while_cached() {
    let spot = fake_spot(1);
    let reader = reader(vec![spot.clone()]);

    assert_eq!(reader.spot(SpotId(1)).await.unwrap(), Some(spot.clone()));
    assert_eq!(reader.spot(SpotId(1)).await.unwrap(), Some(spot));
    assert_eq!(reader.source().spot_calls.load(Ordering::SeqCst), 1);

    advance(CacheSettings::DEFAULT_ENTITY_TTL).await;
    reader.spot(SpotId(1)).await.unwrap();
    assert_eq!(reader.source().spot_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_missing_spot_is_not_cached() {
    let reader = reader(Vec::new());

    assert_eq!(reader.spot(SpotId(404)).await.unwrap(), None);
    assert_eq!(reader.spot(SpotId(404)).await.unwrap(), None);
    assert_eq!(reader.source().spot_calls.load(Ordering::SeqCst), 2);
    assert!(reader.cache().store().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_source_failure_propagates_and_caches_nothing() {
    let reader = reader(vec![fake_spot(1)]);
    reader.source().fail(true);

    let err = reader.spot(SpotId(1)).await.unwrap_err();
    assert!(matches!(err, Error::Source(_)));
    assert!(reader.media_for(SpotId(1)).await.is_err());
    assert!(reader.spots_within(0.0, 0.0, 10.0).await.is_err());
    assert!(reader.cache().store().is_empty());

    // recovery: the next call retries the source
    reader.source().fail(false);
    assert!(reader.spot(SpotId(1)).await.unwrap().is_some());
    assert_eq!(reader.media_for(SpotId(1)).await.unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_area_read_through_warms_entities() {
    let near = vec![fake_spot_near(1, 45.0, 6.0), fake_spot_near(2, 45.01, 6.01)];
    let reader = reader(near.clone());

    let found = reader.spots_within(45.00001, 6.00001, 5.02).await.unwrap();
    assert_eq!(found, near);

    // same quantized window, served from cache
    reader.spots_within(45.0, 6.0, 5.0).await.unwrap();
    assert_eq!(reader.source().area_calls.load(Ordering::SeqCst), 1);

    // entity lookups are warm
    reader.spot(SpotId(2)).await.unwrap();
    assert_eq!(reader.source().spot_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_empty_area_is_cached() {
    let reader = reader(vec![fake_spot_near(1, 10.0, 10.0)]);

    assert!(reader.spots_within(-30.0, 100.0, 1.0).await.unwrap().is_empty());
    assert!(reader.spots_within(-30.0, 100.0, 1.0).await.unwrap().is_empty());
    assert_eq!(reader.source().area_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_media_invalidation_forces_refetch() {
    let reader = reader(vec![fake_spot(3)]);

    let media = reader.media_for(SpotId(3)).await.unwrap();
    assert_eq!(reader.cache().get_media(SpotId(3)), media);

    reader.cache().invalidate_entity(SpotId(3));
    reader.media_for(SpotId(3)).await.unwrap();
    assert_eq!(reader.source().media_calls.load(Ordering::SeqCst), 2);
}
