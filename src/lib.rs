// src/lib.rs
//! Evidential estimation of event locations from clustered short messages.
//!
//! Three weak evidence channels per message (geotag, text content, profile
//! location) are turned into Dempster-Shafer mass assignments over a fixed
//! set of candidate locations, fused with the Dubois–Prade rule, and ranked
//! by commonality. See [`estimate::LocationEstimator`].

pub mod config;
pub mod dataset;
pub mod error;
pub mod estimate;
pub mod evidence;
pub mod location;

// ---- Re-exports for stable public API ----
pub use crate::config::EstimatorConfig;
pub use crate::error::EstimateError;
pub use crate::estimate::{Estimation, LocationEstimator};
pub use crate::evidence::{Channel, EvidenceSet, LocationScore, MassAssignment};
pub use crate::location::{Location, LocationId, Message, MessageId, Region};
