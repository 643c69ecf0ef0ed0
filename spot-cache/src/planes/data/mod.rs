pub mod read_through;
pub mod spot_cache;

pub use read_through::CachedSpotSource;
pub use spot_cache::SpotCache;
