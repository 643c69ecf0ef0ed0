use crate::domain::{Media, Spot, SpotId};
use async_trait::async_trait;
use shared::Result;

// Ports are the extension points for the backing store the cache sits in front of

/// Port for the data store that owns spots and their media.
///
/// The cache only reads through it on a miss; writes to the store happen
/// elsewhere and are followed by an invalidation call on the cache.
#[async_trait]
pub trait SpotSource: Send + Sync + 'static {
    async fn spot(&self, id: SpotId) -> Result<Option<Spot>>;

    async fn spots_within(&self, latitude: f64, longitude: f64, radius_km: f64) -> Result<Vec<Spot>>;

    async fn media_for(&self, spot_id: SpotId) -> Result<Vec<Media>>;
}
