// src/estimate/commonality.rs
//! Commonality scores and selection of the best-supported locations.
//!
//! Q({x}) = Σ m(A) over every focal set A containing x. Locations that appear
//! in no focal set get no entry (implicit commonality 0).

use std::collections::BTreeMap;

use crate::evidence::{LocationScore, MassAssignment};
use crate::location::LocationId;

/// Per-location commonality of a (combined) assignment.
pub fn commonality_scores(bpa: &MassAssignment) -> BTreeMap<LocationId, f64> {
    let mut scores: BTreeMap<LocationId, f64> = BTreeMap::new();
    for (set, mass) in bpa.iter() {
        for id in set.iter() {
            *scores.entry(id).or_insert(0.0) += mass;
        }
    }
    scores
}

/// Every location whose score is within `tie_epsilon` of the maximum.
///
/// `tie_epsilon = 0.0` keeps only exact ties. Output is ordered by location id.
pub fn highest_scores(scores: &BTreeMap<LocationId, f64>, tie_epsilon: f64) -> Vec<LocationScore> {
    let Some(max) = scores.values().copied().reduce(f64::max) else {
        return Vec::new();
    };
    scores
        .iter()
        .filter(|(_, v)| max - **v <= tie_epsilon)
        .map(|(id, v)| LocationScore {
            location_id: *id,
            commonality: *v,
        })
        .collect()
}
