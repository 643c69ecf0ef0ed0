use crate::{Error, Result};
use std::time::Duration;
use tracing::warn;

/// Startup-time cache configuration: per-namespace default TTLs and the sweep cadence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSettings {
    pub entity_ttl: Duration,
    pub area_ttl: Duration,
    pub media_ttl: Duration,
    pub sweep_interval: Duration,
    pub event_capacity: usize,
}

impl CacheSettings {
    pub const DEFAULT_ENTITY_TTL: Duration = Duration::from_secs(30 * 60);
    pub const DEFAULT_AREA_TTL: Duration = Duration::from_secs(15 * 60);
    pub const DEFAULT_MEDIA_TTL: Duration = Duration::from_secs(60 * 60);
    pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);
    pub const DEFAULT_EVENT_CAPACITY: usize = 256;

    const ENTITY_TTL_VAR: &str = "SPOT_CACHE_ENTITY_TTL_SECS";
    const AREA_TTL_VAR: &str = "SPOT_CACHE_AREA_TTL_SECS";
    const MEDIA_TTL_VAR: &str = "SPOT_CACHE_MEDIA_TTL_SECS";
    const SWEEP_INTERVAL_VAR: &str = "SPOT_CACHE_SWEEP_INTERVAL_SECS";
    const EVENT_CAPACITY_VAR: &str = "SPOT_CACHE_EVENT_CAPACITY";

    /// Reads settings from the environment, falling back to defaults for
    /// anything missing or malformed.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Strict variant of [`CacheSettings::from_env`]: malformed values are errors.
    pub fn try_from_env() -> Result<Self> {
        Self::try_from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secs_or = |key: &str, fallback: Duration| match parse_secs(key, lookup(key)) {
            Ok(Some(value)) => value,
            Ok(None) => fallback,
            Err(err) => {
                warn!(%err, "falling back to default {:?}", fallback);
                fallback
            }
        };

        let mut sweep_interval = secs_or(Self::SWEEP_INTERVAL_VAR, defaults.sweep_interval);
        if sweep_interval.is_zero() {
            warn!("{} must be positive, using default", Self::SWEEP_INTERVAL_VAR);
            sweep_interval = defaults.sweep_interval;
        }

        let event_capacity = match parse_usize(Self::EVENT_CAPACITY_VAR, lookup(Self::EVENT_CAPACITY_VAR)) {
            Ok(Some(capacity)) if capacity > 0 => capacity,
            Ok(_) => defaults.event_capacity,
            Err(err) => {
                warn!(%err, "falling back to default event capacity");
                defaults.event_capacity
            }
        };

        Self {
            entity_ttl: secs_or(Self::ENTITY_TTL_VAR, defaults.entity_ttl),
            area_ttl: secs_or(Self::AREA_TTL_VAR, defaults.area_ttl),
            media_ttl: secs_or(Self::MEDIA_TTL_VAR, defaults.media_ttl),
            sweep_interval,
            event_capacity,
        }
    }

    pub fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let secs = |key: &str, fallback: Duration| -> Result<Duration> {
            Ok(parse_secs(key, lookup(key))?.unwrap_or(fallback))
        };

        let sweep_interval = secs(Self::SWEEP_INTERVAL_VAR, defaults.sweep_interval)?;
        if sweep_interval.is_zero() {
            return Err(Error::Config {
                key: Self::SWEEP_INTERVAL_VAR.to_string(),
                value: "0".to_string(),
            });
        }

        let event_capacity = parse_usize(Self::EVENT_CAPACITY_VAR, lookup(Self::EVENT_CAPACITY_VAR))?
            .unwrap_or(defaults.event_capacity);
        if event_capacity == 0 {
            return Err(Error::Config {
                key: Self::EVENT_CAPACITY_VAR.to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            entity_ttl: secs(Self::ENTITY_TTL_VAR, defaults.entity_ttl)?,
            area_ttl: secs(Self::AREA_TTL_VAR, defaults.area_ttl)?,
            media_ttl: secs(Self::MEDIA_TTL_VAR, defaults.media_ttl)?,
            sweep_interval,
            event_capacity,
        })
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            entity_ttl: Self::DEFAULT_ENTITY_TTL,
            area_ttl: Self::DEFAULT_AREA_TTL,
            media_ttl: Self::DEFAULT_MEDIA_TTL,
            sweep_interval: Self::DEFAULT_SWEEP_INTERVAL,
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }
}

fn parse_secs(key: &str, raw: Option<String>) -> Result<Option<Duration>> {
    parse_usize(key, raw).map(|secs| secs.map(|s| Duration::from_secs(s as u64)))
}

fn parse_usize(key: &str, raw: Option<String>) -> Result<Option<usize>> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| Error::Config {
                key: key.to_string(),
                value,
            }),
    }
}
