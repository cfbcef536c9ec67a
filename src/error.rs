// src/error.rs
//! Error type for a single estimation call.
//!
//! Every variant is an input defect: the computation is pure, so retrying the
//! same input fails the same way.

use thiserror::Error;

use crate::evidence::Channel;
use crate::location::LocationId;

pub type Result<T> = std::result::Result<T, EstimateError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// A location in the universe has no region to test points against.
    #[error("location {location_id} has no region")]
    MissingRegion { location_id: LocationId },

    /// A location's region is degenerate (too few vertices, zero area, non-finite).
    #[error("location {location_id} has an invalid region")]
    InvalidRegion { location_id: LocationId },

    /// No candidate locations: Θ would be the empty set.
    #[error("the frame of discernment has no locations")]
    EmptyUniverse,

    /// Two locations in the universe share an id.
    #[error("duplicate location id {location_id} in the frame of discernment")]
    DuplicateLocationId { location_id: LocationId },

    /// A channel assignment built from a non-empty cluster does not sum to 1.
    #[error("{channel} assignment sums to {total}, expected 1")]
    MassInvariant { channel: Channel, total: f64 },
}
