use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Type-erased payload shared between the map and readers.
pub(crate) type Payload = Arc<dyn Any + Send + Sync>;

/// A single cached value with its timestamps.
///
/// `expires_at == None` is the "never expires" sentinel. Entries are replaced on
/// overwrite, never mutated, except for `last_accessed_at`.
#[derive(Clone)]
pub struct CacheEntry {
    pub(crate) value: Payload,
    pub created_at: Instant,
    pub last_accessed_at: Instant,
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    pub(crate) fn new(value: Payload, ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            last_accessed_at: now,
            // checked_add only fails for absurd TTLs; treat those as unbounded
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
        }
    }

    /// Live iff `now < expires_at`.
    pub fn is_live_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires_at) => now < expires_at,
            None => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        !self.is_live_at(Instant::now())
    }

    /// Time left before expiry, `None` for entries that never expire.
    pub fn remaining_ttl(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires_at| expires_at.saturating_duration_since(Instant::now()))
    }

    pub(crate) fn touch(&mut self, now: Instant) {
        self.last_accessed_at = now;
    }

    pub(crate) fn downcast<V>(&self) -> Option<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.value.downcast_ref::<V>().cloned()
    }
}

impl Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("value", &"<dyn Any>")
            .field("created_at", &self.created_at)
            .field("last_accessed_at", &self.last_accessed_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: &str) -> Payload {
        Arc::new(value.to_string())
    }

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let now = Instant::now();
        let entry = CacheEntry::new(payload("v"), None, now);

        assert!(entry.expires_at.is_none());
        assert!(entry.is_live_at(now + Duration::from_secs(10 * 365 * 24 * 3600)));
        assert_eq!(entry.remaining_ttl(), None);
    }

    #[test]
    fn test_entry_dead_exactly_at_expiry() {
        let now = Instant::now();
        let entry = CacheEntry::new(payload("v"), Some(Duration::from_secs(5)), now);

        assert!(entry.is_live_at(now + Duration::from_millis(4999)));
        assert!(!entry.is_live_at(now + Duration::from_secs(5)));
        assert!(entry.expires_at.unwrap() >= entry.created_at);
    }

    #[test]
    fn test_zero_ttl_is_immediately_dead() {
        let now = Instant::now();
        let entry = CacheEntry::new(payload("v"), Some(Duration::ZERO), now);
        assert!(!entry.is_live_at(now));
    }

    #[test]
    fn test_downcast_with_wrong_type_is_none() {
        let entry = CacheEntry::new(payload("v"), None, Instant::now());
        assert_eq!(entry.downcast::<String>(), Some("v".to_string()));
        assert_eq!(entry.downcast::<u64>(), None);
    }
}
