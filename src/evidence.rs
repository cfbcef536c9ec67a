// src/evidence.rs
//! Evidence primitives: canonical location sets, mass assignments and scores.
//!
//! `EvidenceSet` keeps its ids sorted and deduplicated, so derived
//! `Eq`/`Hash`/`Ord` are structural: `{3,1,2}` and `{1,2,3}` are the same key.
//! `MassAssignment` is ordered by that key, which keeps iteration (and thus
//! floating-point summation order) identical from run to run.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::location::LocationId;

/// Evidence channel a mapping was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Geo,
    Content,
    Profile,
}

impl Channel {
    /// Combination order: geo ⊕ content first, then ⊕ profile.
    pub const ORDER: [Channel; 3] = [Channel::Geo, Channel::Content, Channel::Profile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Geo => "geo",
            Channel::Content => "content",
            Channel::Profile => "profile",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sorted, deduplicated set of location ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EvidenceSet(Vec<LocationId>);

impl EvidenceSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_ids<I: IntoIterator<Item = LocationId>>(ids: I) -> Self {
        let mut v: Vec<LocationId> = ids.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        Self(v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn ids(&self) -> &[LocationId] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.0.iter().copied()
    }

    /// Merge-walk intersection of two sorted sets.
    pub fn intersection(&self, other: &Self) -> Self {
        let (a, b) = (&self.0, &other.0);
        let mut out = Vec::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        Self(out)
    }

    /// Merge-walk union of two sorted sets.
    pub fn union(&self, other: &Self) -> Self {
        let (a, b) = (&self.0, &other.0);
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => {
                    out.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);
        Self(out)
    }
}

impl FromIterator<LocationId> for EvidenceSet {
    fn from_iter<I: IntoIterator<Item = LocationId>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

impl fmt::Display for EvidenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
        }
        f.write_str("}")
    }
}

/// Basic probability assignment: mass committed to each focal set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MassAssignment {
    masses: BTreeMap<EvidenceSet, f64>,
}

impl MassAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total ignorance: all mass on Θ.
    pub fn vacuous(theta: EvidenceSet) -> Self {
        let mut m = Self::new();
        m.add_mass(theta, 1.0);
        m
    }

    /// Accumulate `mass` onto `set` (merges with any existing entry).
    pub fn add_mass(&mut self, set: EvidenceSet, mass: f64) {
        *self.masses.entry(set).or_insert(0.0) += mass;
    }

    pub fn mass(&self, set: &EvidenceSet) -> f64 {
        self.masses.get(set).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.masses.values().sum()
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EvidenceSet, f64)> + '_ {
        self.masses.iter().map(|(k, v)| (k, *v))
    }
}

/// Serialized as a list of `{ "set": [..], "mass": .. }` (JSON map keys must be strings).
impl Serialize for MassAssignment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct FocalElement<'a> {
            set: &'a EvidenceSet,
            mass: f64,
        }
        serializer.collect_seq(
            self.masses
                .iter()
                .map(|(set, mass)| FocalElement { set, mass: *mass }),
        )
    }
}

impl FromIterator<(EvidenceSet, f64)> for MassAssignment {
    fn from_iter<I: IntoIterator<Item = (EvidenceSet, f64)>>(iter: I) -> Self {
        let mut m = Self::new();
        for (set, mass) in iter {
            m.add_mass(set, mass);
        }
        m
    }
}

/// Cumulative commonality of one location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationScore {
    pub location_id: LocationId,
    pub commonality: f64,
}

impl fmt::Display for LocationScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{:.3})", self.location_id, self.commonality)
    }
}
