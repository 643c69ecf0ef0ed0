use crate::domain::SpotId;
use serde::{Deserialize, Serialize};

/// Published by the invalidation coordinator after entries have been removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvalidationEvent {
    SpotInvalidated(SpotInvalidatedEvent),
    AreaInvalidated(AreaInvalidatedEvent),
    Cleared(ClearedEvent),
}

impl InvalidationEvent {
    pub fn timestamp(&self) -> i64 {
        match self {
            InvalidationEvent::SpotInvalidated(e) => e.timestamp,
            InvalidationEvent::AreaInvalidated(e) => e.timestamp,
            InvalidationEvent::Cleared(e) => e.timestamp,
        }
    }

    /// Store keys removed by this invalidation; empty for a full clear.
    pub fn keys(&self) -> Vec<String> {
        match self {
            InvalidationEvent::SpotInvalidated(e) => e.keys.clone(),
            InvalidationEvent::AreaInvalidated(e) => vec![e.key.clone()],
            InvalidationEvent::Cleared(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotInvalidatedEvent {
    pub spot_id: SpotId,
    pub keys: Vec<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaInvalidatedEvent {
    pub key: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearedEvent {
    pub timestamp: i64,
}

/// Milliseconds since the UNIX epoch.
pub fn now_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = InvalidationEvent::SpotInvalidated(SpotInvalidatedEvent {
            spot_id: SpotId(7),
            keys: vec!["spot:7".to_string(), "media:7".to_string()],
            timestamp: 1_700_000_000_000,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "spot_invalidated");
        assert_eq!(json["spot_id"], 7);

        let back: InvalidationEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_event_keys() {
        let area = InvalidationEvent::AreaInvalidated(AreaInvalidatedEvent {
            key: "area:1:2:3".to_string(),
            timestamp: now_timestamp_ms(),
        });
        assert_eq!(area.keys(), vec!["area:1:2:3".to_string()]);

        let cleared = InvalidationEvent::Cleared(ClearedEvent { timestamp: 0 });
        assert!(cleared.keys().is_empty());
        assert_eq!(cleared.timestamp(), 0);
    }
}
