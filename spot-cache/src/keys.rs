//! Cache key derivation.
//!
//! Each namespace owns a key prefix. Area keys quantize their inputs so that
//! near-identical viewport queries land on one entry: latitude and longitude
//! to 4 decimal places, radius to 1.

use crate::domain::SpotId;
use std::fmt;

pub const ENTITY_PREFIX: &str = "spot";
pub const MEDIA_PREFIX: &str = "media";
pub const AREA_PREFIX: &str = "area";

pub const COORDINATE_DECIMALS: i32 = 4;
pub const RADIUS_DECIMALS: i32 = 1;

pub fn entity_key(id: SpotId) -> String {
    format!("{ENTITY_PREFIX}:{id}")
}

pub fn media_key(id: SpotId) -> String {
    format!("{MEDIA_PREFIX}:{id}")
}

pub fn area_key(latitude: f64, longitude: f64, radius_km: f64) -> String {
    AreaKey::new(latitude, longitude, radius_km).to_string()
}

/// Round half away from zero to `decimals` places.
///
/// Negative zero is folded into zero so both sides of the equator/meridian
/// produce the same key. NaN passes through untouched.
pub fn quantize(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor + 0.0
}

/// Quantized `(latitude, longitude, radius)` triple identifying an area entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaKey {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl AreaKey {
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            latitude: quantize(latitude, COORDINATE_DECIMALS),
            longitude: quantize(longitude, COORDINATE_DECIMALS),
            radius_km: quantize(radius_km, RADIUS_DECIMALS),
        }
    }
}

impl fmt::Display for AreaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{AREA_PREFIX}:{}:{}:{}",
            self.latitude, self.longitude, self.radius_km
        )
    }
}
