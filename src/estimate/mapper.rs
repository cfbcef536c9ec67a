// src/estimate/mapper.rs
//! Per-channel mapping of messages to the candidate locations they support.
//!
//! Each mapper returns one `EvidenceSet` per message, index-aligned with the
//! input slice. An empty set means "no evidence from this channel"; the
//! assignment builder later redirects it to Θ.
//!
//! Text channels split on whitespace and `, . ( ) ! ? : ; " “ ” ' @ # / \ - &`,
//! then match each token exactly against location names after folding
//! case char by char (see [`fold_case`]). A multi-word name can therefore
//! never match.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::error::{EstimateError, Result};
use crate::evidence::{Channel, EvidenceSet};
use crate::location::{Location, LocationId, Message, Region};

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\s,.()!?:;"“”'@#/\\&-]+"#).expect("separator regex"));

/// Split `text` into non-empty terms.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> + '_ {
    SEPARATORS.split(text).filter(|t| !t.is_empty())
}

/// Fold `text` one char at a time: upper, then lower, each a single-char
/// mapping. 'İ', 'I', 'i' and 'ı' all fold to 'i'.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            let u = match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            };
            u.to_lowercase().next().unwrap_or(u)
        })
        .collect()
}

/// Case-folded location name → ids carrying that name.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_name: HashMap<String, Vec<LocationId>>,
}

impl NameIndex {
    /// Names are keyed as given (no trimming); empty names are skipped.
    pub fn new(locations: &[Location]) -> Self {
        let mut by_name: HashMap<String, Vec<LocationId>> = HashMap::new();
        for loc in locations.iter().filter(|l| !l.name.is_empty()) {
            by_name.entry(fold_case(&loc.name)).or_default().push(loc.id);
        }
        Self { by_name }
    }

    /// Ids of every location whose name equals some term of `text`.
    pub fn lookup_text(&self, text: Option<&str>) -> EvidenceSet {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return EvidenceSet::empty();
        };
        tokenize(text)
            .filter_map(|term| self.by_name.get(&fold_case(term)))
            .flatten()
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Checks every region up front; one bad location fails the whole mapping.
fn checked_regions(locations: &[Location]) -> Result<Vec<(LocationId, &dyn Region)>> {
    locations
        .iter()
        .map(|loc| {
            let region = loc.region.as_deref().ok_or(EstimateError::MissingRegion {
                location_id: loc.id,
            })?;
            if !region.is_valid() {
                return Err(EstimateError::InvalidRegion {
                    location_id: loc.id,
                });
            }
            Ok((loc.id, region))
        })
        .collect()
}

/// Geo channel: ids of all regions strictly containing the message's geotag.
pub fn map_by_coordinate(messages: &[Message], locations: &[Location]) -> Result<Vec<EvidenceSet>> {
    let regions = checked_regions(locations)?;
    let mapped = messages
        .iter()
        .map(|msg| match msg.geotag() {
            Some((lat, lon)) => regions
                .iter()
                .filter(|(_, region)| region.contains(lat, lon))
                .map(|(id, _)| *id)
                .collect(),
            None => EvidenceSet::empty(),
        })
        .collect::<Vec<EvidenceSet>>();
    log_mapping(Channel::Geo, &mapped);
    Ok(mapped)
}

/// Content channel: location names mentioned in the message text.
pub fn map_by_content(messages: &[Message], locations: &[Location]) -> Vec<EvidenceSet> {
    map_text(messages, &NameIndex::new(locations), Channel::Content)
}

/// Profile channel: location names in the author's profile field.
pub fn map_by_profile(messages: &[Message], locations: &[Location]) -> Vec<EvidenceSet> {
    map_text(messages, &NameIndex::new(locations), Channel::Profile)
}

/// Text mapping against a prebuilt index. `channel` selects the field;
/// `Channel::Geo` has no text and maps everything to the empty set.
pub fn map_text(messages: &[Message], index: &NameIndex, channel: Channel) -> Vec<EvidenceSet> {
    let mapped = messages
        .iter()
        .map(|msg| match channel {
            _ if index.is_empty() => EvidenceSet::empty(),
            Channel::Content => index.lookup_text(msg.content.as_deref()),
            Channel::Profile => index.lookup_text(msg.profile_location.as_deref()),
            Channel::Geo => EvidenceSet::empty(),
        })
        .collect::<Vec<EvidenceSet>>();
    log_mapping(channel, &mapped);
    mapped
}

fn log_mapping(channel: Channel, mapped: &[EvidenceSet]) {
    let matched = mapped.iter().filter(|s| !s.is_empty()).count();
    tracing::trace!(
        target: "estimator",
        channel = %channel,
        messages = mapped.len(),
        matched,
        "mapped messages to locations"
    );
}
