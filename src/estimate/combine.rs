// src/estimate/combine.rs
//! Dubois–Prade combination of two mass assignments.
//!
//! For every pair of focal sets (A, B) the product m1(A)·m2(B) goes to A ∩ B
//! when they overlap, and to A ∪ B when they conflict. Nothing is discarded,
//! so no renormalization is needed.
//!
//! Summation order is fixed: overlapping products are accumulated first in
//! key order, then the conflict products are folded in per union key. Keep it
//! that way; reordering changes the low bits of the result.

use std::collections::BTreeMap;

use crate::evidence::{EvidenceSet, MassAssignment};

/// Combine `bpa1` with `bpa2`. An empty operand yields an empty result.
pub fn combine_dubois_prade(bpa1: &MassAssignment, bpa2: &MassAssignment) -> MassAssignment {
    combine_tracked(bpa1, bpa2).0
}

/// Like [`combine_dubois_prade`], also returning the conflicting mass that
/// was moved to unions.
pub fn combine_tracked(bpa1: &MassAssignment, bpa2: &MassAssignment) -> (MassAssignment, f64) {
    let mut combined = MassAssignment::new();
    let mut unions: BTreeMap<EvidenceSet, f64> = BTreeMap::new();

    for (a, mass_a) in bpa1.iter() {
        for (b, mass_b) in bpa2.iter() {
            let product = mass_a * mass_b;
            let common = a.intersection(b);
            if common.is_empty() {
                *unions.entry(a.union(b)).or_insert(0.0) += product;
            } else {
                combined.add_mass(common, product);
            }
        }
    }

    let mut conflict = 0.0;
    for (set, mass) in unions {
        conflict += mass;
        combined.add_mass(set, mass);
    }

    (combined, conflict)
}

/// Left fold: `((s0 ⊕ s1) ⊕ s2) ⊕ ...`. No sources → empty assignment.
pub fn combine_in_order<'a, I>(sources: I) -> MassAssignment
where
    I: IntoIterator<Item = &'a MassAssignment>,
{
    combine_in_order_tracked(sources).0
}

/// [`combine_in_order`] plus the conflict of each step, one entry per
/// source after the first.
pub fn combine_in_order_tracked<'a, I>(sources: I) -> (MassAssignment, Vec<f64>)
where
    I: IntoIterator<Item = &'a MassAssignment>,
{
    let mut iter = sources.into_iter();
    let Some(first) = iter.next() else {
        return (MassAssignment::new(), Vec::new());
    };
    let mut conflicts = Vec::new();
    let combined = iter.fold(first.clone(), |acc, next| {
        let (out, conflict) = combine_tracked(&acc, next);
        conflicts.push(conflict);
        out
    });
    (combined, conflicts)
}
