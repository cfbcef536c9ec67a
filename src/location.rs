// src/location.rs
//! Input records: candidate locations (the frame of discernment) and messages.
//!
//! Both are immutable value records built once by the caller. A `Location`
//! carries its geometry as a shared `Region` capability; the estimator only
//! asks it whether a point is inside.
//!
//! Coordinate convention: a message's `(latitude, longitude)` is handed to
//! `Region::contains` unchanged, and the geometry implementations read it as
//! `(x, y)`. Regions are open: a point exactly on a boundary edge is outside.

use geo::{Area, Contains, MultiPolygon, Point, Polygon};
use std::fmt;
use std::sync::Arc;

pub type LocationId = i64;
pub type MessageId = i64;

/// Point-containment capability consumed by the geo channel.
pub trait Region: Send + Sync {
    /// True if `(latitude, longitude)` lies strictly inside the region.
    fn contains(&self, latitude: f64, longitude: f64) -> bool;

    /// False for degenerate geometry that cannot answer `contains` meaningfully.
    fn is_valid(&self) -> bool {
        true
    }
}

impl Region for Polygon<f64> {
    fn contains(&self, latitude: f64, longitude: f64) -> bool {
        Contains::contains(self, &Point::new(latitude, longitude))
    }

    fn is_valid(&self) -> bool {
        let ring = &self.exterior().0;
        ring.len() >= 4
            && ring.iter().all(|c| c.x.is_finite() && c.y.is_finite())
            && self.unsigned_area() > 0.0
    }
}

impl Region for MultiPolygon<f64> {
    fn contains(&self, latitude: f64, longitude: f64) -> bool {
        Contains::contains(self, &Point::new(latitude, longitude))
    }

    fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(Region::is_valid)
    }
}

/// A candidate location. `region` is `None` only when the caller failed to
/// supply geometry; the geo channel rejects such a universe.
#[derive(Clone)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub region: Option<Arc<dyn Region>>,
}

impl Location {
    pub fn new(id: LocationId, name: impl Into<String>, region: impl Region + 'static) -> Self {
        Self {
            id,
            name: name.into(),
            region: Some(Arc::new(region)),
        }
    }

    /// A location with no geometry attached (text channels still see it).
    pub fn without_region(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            region: None,
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("has_region", &self.region.is_some())
            .finish()
    }
}

/// One short message of a cluster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub content: Option<String>,
    /// `(latitude, longitude)`; `None` when the message is not geotagged.
    pub coordinate: Option<(f64, f64)>,
    pub profile_location: Option<String>,
}

impl Message {
    pub fn new(id: MessageId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Builder: set the text content.
    pub fn content(mut self, text: impl Into<String>) -> Self {
        self.content = Some(text.into());
        self
    }

    /// Builder: set the geotag.
    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinate = Some((latitude, longitude));
        self
    }

    /// Builder: set the free-text profile location.
    pub fn profile(mut self, text: impl Into<String>) -> Self {
        self.profile_location = Some(text.into());
        self
    }

    /// Geotag, if present and finite.
    pub fn geotag(&self) -> Option<(f64, f64)> {
        self.coordinate
            .filter(|(lat, lon)| lat.is_finite() && lon.is_finite())
    }
}
