// src/dataset.rs
//! JSON fixtures: a location universe plus message clusters.
//!
//! ```json
//! {
//!   "locations": [{ "id": 1, "name": "city1", "boundary": [[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0]] }],
//!   "clusters": [[{ "id": 0, "content": "city1", "latitude": 1.5, "longitude": 0.5, "profile_location": null }]]
//! }
//! ```
//!
//! Boundary points are `[x, y]` in the same convention messages use for
//! `(latitude, longitude)`. An empty `boundary` leaves the location without a
//! region, which the estimator rejects.

use anyhow::{Context, Result};
use geo::{LineString, Polygon};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::location::{Location, LocationId, Message, MessageId};

#[derive(Debug, Clone, Deserialize)]
pub struct LocationRecord {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub boundary: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub profile_location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DatasetFile {
    locations: Vec<LocationRecord>,
    #[serde(default)]
    clusters: Vec<Vec<MessageRecord>>,
}

/// Locations and clusters ready for estimation.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub locations: Vec<Location>,
    pub clusters: Vec<Vec<Message>>,
}

impl From<LocationRecord> for Location {
    fn from(r: LocationRecord) -> Self {
        if r.boundary.is_empty() {
            return Location::without_region(r.id, r.name);
        }
        let ring: LineString<f64> = r.boundary.into_iter().map(|[x, y]| (x, y)).collect();
        Location::new(r.id, r.name, Polygon::new(ring, vec![]))
    }
}

impl From<MessageRecord> for Message {
    fn from(r: MessageRecord) -> Self {
        // Half a coordinate is no geotag.
        let coordinate = match (r.latitude, r.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        Message {
            id: r.id,
            content: r.content,
            coordinate,
            profile_location: r.profile_location,
        }
    }
}

impl Dataset {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let file: DatasetFile = serde_json::from_str(s)?;
        Ok(Self {
            locations: file.locations.into_iter().map(Location::from).collect(),
            clusters: file
                .clusters
                .into_iter()
                .map(|c| c.into_iter().map(Message::from).collect())
                .collect(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dataset from {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("parsing dataset at {}", path.display()))
    }
}
