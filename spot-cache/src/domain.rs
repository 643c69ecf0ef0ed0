use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a spot in the backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(pub i64);

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SpotId {
    fn from(id: i64) -> Self {
        SpotId(id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpotType {
    pub id: i64,
    pub name: String,
}

impl SpotType {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A geolocated point of interest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: SpotId,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub spot_type: Option<SpotType>,
}

impl Spot {
    pub fn new(id: impl Into<SpotId>, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            latitude,
            longitude,
            spot_type: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type(mut self, spot_type: SpotType) -> Self {
        self.spot_type = Some(spot_type);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

/// A photo or video attached to a spot. Lists keep the order they were cached in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    pub spot_id: SpotId,
    pub url: String,
    pub kind: MediaKind,
    pub position: u32,
}

impl Media {
    pub fn new(id: i64, spot_id: SpotId, url: impl Into<String>, kind: MediaKind, position: u32) -> Self {
        Self {
            id,
            spot_id,
            url: url.into(),
            kind,
            position,
        }
    }
}
