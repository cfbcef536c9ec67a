// src/estimate/assignment.rs
//! Basic probability assignment for one channel.
//!
//! Each of the N messages contributes 1/N to its mapped evidence set;
//! messages with no evidence contribute to Θ instead. N = 0 yields an empty
//! assignment.

use std::collections::BTreeMap;

use crate::error::{EstimateError, Result};
use crate::evidence::{Channel, EvidenceSet, MassAssignment};

/// Build the channel BPA from an index-aligned message→set mapping.
pub fn build_assignment(mapped: &[EvidenceSet], theta: &EvidenceSet) -> MassAssignment {
    let n = mapped.len();
    if n == 0 {
        return MassAssignment::new();
    }

    let mut counts: BTreeMap<&EvidenceSet, usize> = BTreeMap::new();
    let mut unmapped = 0usize;
    for set in mapped {
        if set.is_empty() {
            unmapped += 1;
        } else {
            *counts.entry(set).or_insert(0) += 1;
        }
    }
    // A message may map to every location; it then shares Θ's entry.
    if unmapped > 0 {
        *counts.entry(theta).or_insert(0) += unmapped;
    }

    counts
        .into_iter()
        .map(|(set, count)| (set.clone(), count as f64 / n as f64))
        .collect()
}

/// Verify a non-empty channel assignment sums to 1 within `tolerance`.
pub fn check_total(channel: Channel, bpa: &MassAssignment, tolerance: f64) -> Result<()> {
    if bpa.is_empty() {
        return Ok(());
    }
    let total = bpa.total();
    if (total - 1.0).abs() > tolerance {
        return Err(EstimateError::MassInvariant { channel, total });
    }
    Ok(())
}
