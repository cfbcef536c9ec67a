// src/estimate/mod.rs
//! Evidential location estimation for one message cluster.
//!
//! Pipeline per cluster:
//! 1) map messages to location sets per channel (geo, content, profile)
//! 2) build one mass assignment per channel (unmatched → Θ)
//! 3) combine with Dubois–Prade: (geo ⊕ content) ⊕ profile
//! 4) commonality per location, keep the maximum (ties included)
//!
//! The estimator borrows the location universe read-only and keeps no state
//! between calls, so one instance can serve concurrent callers.

pub mod assignment;
pub mod combine;
pub mod commonality;
pub mod mapper;

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use crate::config::EstimatorConfig;
use crate::error::{EstimateError, Result};
use crate::evidence::{Channel, EvidenceSet, LocationScore, MassAssignment};
use crate::location::{Location, LocationId, Message};

pub use assignment::{build_assignment, check_total};
pub use combine::{
    combine_dubois_prade, combine_in_order, combine_in_order_tracked, combine_tracked,
};
pub use commonality::{commonality_scores, highest_scores};
pub use mapper::{map_by_content, map_by_coordinate, map_by_profile, NameIndex};

/// One channel's contribution, kept for explainability.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelEvidence {
    pub channel: Channel,
    /// Messages that produced at least one location.
    pub matched_messages: usize,
    pub assignment: MassAssignment,
}

/// Full record of one estimation call.
#[derive(Debug, Clone, Serialize)]
pub struct Estimation {
    pub cluster_size: usize,
    /// In combination order: geo, content, profile.
    pub channels: Vec<ChannelEvidence>,
    /// Conflicting mass moved to unions at each combination step.
    pub conflicts: Vec<f64>,
    pub combined: MassAssignment,
    pub commonality: BTreeMap<LocationId, f64>,
    pub best: Vec<LocationScore>,
}

impl Estimation {
    fn empty() -> Self {
        Self {
            cluster_size: 0,
            channels: Vec::new(),
            conflicts: Vec::new(),
            combined: MassAssignment::new(),
            commonality: BTreeMap::new(),
            best: Vec::new(),
        }
    }
}

/// Estimator over a fixed frame of discernment.
#[derive(Debug)]
pub struct LocationEstimator<'a> {
    locations: &'a [Location],
    theta: EvidenceSet,
    names: NameIndex,
    cfg: EstimatorConfig,
}

impl<'a> LocationEstimator<'a> {
    /// Rejects an empty universe and duplicate location ids. Regions are
    /// checked when a cluster is mapped.
    pub fn new(locations: &'a [Location], cfg: EstimatorConfig) -> Result<Self> {
        if locations.is_empty() {
            return Err(EstimateError::EmptyUniverse);
        }
        let mut seen = HashSet::with_capacity(locations.len());
        for loc in locations {
            if !seen.insert(loc.id) {
                return Err(EstimateError::DuplicateLocationId {
                    location_id: loc.id,
                });
            }
        }
        let names = NameIndex::new(locations);
        debug!(
            target: "estimator",
            locations = locations.len(),
            distinct_names = names.len(),
            "estimator ready"
        );
        Ok(Self {
            locations,
            theta: locations.iter().map(|l| l.id).collect(),
            names,
            cfg: cfg.sanitized(),
        })
    }

    /// Θ: every location id in the universe.
    pub fn theta(&self) -> &EvidenceSet {
        &self.theta
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.cfg
    }

    /// Best-supported location(s) for `cluster`; empty if the cluster is empty.
    pub fn estimate(&self, cluster: &[Message]) -> Result<Vec<LocationScore>> {
        Ok(self.estimate_detailed(cluster)?.best)
    }

    /// Same as [`estimate`](Self::estimate), keeping every intermediate result.
    pub fn estimate_detailed(&self, cluster: &[Message]) -> Result<Estimation> {
        // Mapping validates regions even for an empty cluster.
        let geo = map_by_coordinate(cluster, self.locations)?;
        if cluster.is_empty() {
            debug!(target: "estimator", "empty cluster, no evidence");
            return Ok(Estimation::empty());
        }
        let content = mapper::map_text(cluster, &self.names, Channel::Content);
        let profile = mapper::map_text(cluster, &self.names, Channel::Profile);

        let mut channels = Vec::with_capacity(Channel::ORDER.len());
        for (channel, mapped) in Channel::ORDER.into_iter().zip([geo, content, profile]) {
            let assignment = build_assignment(&mapped, &self.theta);
            check_total(channel, &assignment, self.cfg.mass_tolerance)?;
            let matched_messages = mapped.iter().filter(|s| !s.is_empty()).count();
            debug!(
                target: "estimator",
                channel = %channel,
                focal_sets = assignment.len(),
                matched_messages,
                theta_mass = assignment.mass(&self.theta),
                "channel assignment built"
            );
            channels.push(ChannelEvidence {
                channel,
                matched_messages,
                assignment,
            });
        }

        // Left to right: (geo ⊕ content) ⊕ profile.
        let (combined, conflicts) =
            combine_in_order_tracked(channels.iter().map(|c| &c.assignment));
        for (next, conflict) in channels[1..].iter().zip(&conflicts) {
            debug!(
                target: "estimator",
                with = %next.channel,
                conflict = *conflict,
                "combined assignment"
            );
        }
        debug!(target: "estimator", focal_sets = combined.len(), "fusion finished");

        let commonality = commonality_scores(&combined);
        // All mass on Θ ties every candidate; report that as no estimate.
        let best = if channels.iter().all(|c| c.matched_messages == 0) {
            warn!(
                target: "estimator",
                cluster_size = cluster.len(),
                "no channel produced location evidence"
            );
            Vec::new()
        } else {
            highest_scores(&commonality, self.cfg.tie_epsilon)
        };
        debug!(
            target: "estimator",
            cluster_size = cluster.len(),
            best = ?best.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "estimation finished"
        );

        Ok(Estimation {
            cluster_size: cluster.len(),
            channels,
            conflicts,
            combined,
            commonality,
            best,
        })
    }
}
