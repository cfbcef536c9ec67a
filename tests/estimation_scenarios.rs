// tests/estimation_scenarios.rs
// End-to-end estimation over ten disjoint unit-square cities `city1..city10`
// (city i spans x in [i, i+1], y in [0, 1]).

use evidential_geolocator::{
    estimate::combine::combine_dubois_prade, Channel, EstimateError, EstimatorConfig,
    EvidenceSet, Location, LocationEstimator, Message,
};
use geo::polygon;

fn city(i: i64) -> Location {
    let x = i as f64;
    Location::new(
        i,
        format!("city{i}"),
        polygon![
            (x: x, y: 0.0),
            (x: x + 1.0, y: 0.0),
            (x: x + 1.0, y: 1.0),
            (x: x, y: 1.0)
        ],
    )
}

fn cities() -> Vec<Location> {
    (1..=10).map(city).collect()
}

fn msg(id: i64, content: &str, lat: f64, lon: f64, profile: &str) -> Message {
    Message::new(id).content(content).at(lat, lon).profile(profile)
}

fn set(ids: &[i64]) -> EvidenceSet {
    EvidenceSet::from_ids(ids.iter().copied())
}

#[test]
fn single_best_location() {
    let locs = cities();
    let est = LocationEstimator::new(&locs, EstimatorConfig::default()).unwrap();

    // geo:     {1}=1/4, {2}=1/4, Θ=2/4
    // content: {1}=1/4, {1,2}=1/4, Θ=2/4
    // profile: {1}=1/4, Θ=3/4
    let cluster = vec![
        msg(0, "lorem ipsum city1 city2", 0.0, 0.0, "city1"),
        msg(1, "lorem ipsum", 1.5, 0.5, "lorem ipsum"),
        msg(2, "city1", 2.5, 0.5, "lorem ipsum"),
        msg(3, "", 0.0, 0.0, ""),
    ];

    let best = est.estimate(&cluster).unwrap();
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].location_id, 1);
    assert!((best[0].commonality - 0.859375).abs() < 1e-15);
}

#[test]
fn single_best_location_intermediate_assignments() {
    let locs = cities();
    let est = LocationEstimator::new(&locs, EstimatorConfig::default()).unwrap();
    let theta = est.theta().clone();

    let cluster = vec![
        msg(0, "lorem ipsum city1 city2", 0.0, 0.0, "city1"),
        msg(1, "lorem ipsum", 1.5, 0.5, "lorem ipsum"),
        msg(2, "city1", 2.5, 0.5, "lorem ipsum"),
        msg(3, "", 0.0, 0.0, ""),
    ];
    let out = est.estimate_detailed(&cluster).unwrap();

    let channels: Vec<Channel> = out.channels.iter().map(|c| c.channel).collect();
    assert_eq!(channels, Channel::ORDER.to_vec());

    let geo = &out.channels[0].assignment;
    assert_eq!(geo.mass(&set(&[1])), 0.25);
    assert_eq!(geo.mass(&set(&[2])), 0.25);
    assert_eq!(geo.mass(&theta), 0.5);

    let content = &out.channels[1].assignment;
    assert_eq!(content.mass(&set(&[1])), 0.25);
    assert_eq!(content.mass(&set(&[1, 2])), 0.25);
    assert_eq!(content.mass(&theta), 0.5);

    let profile = &out.channels[2].assignment;
    assert_eq!(profile.mass(&set(&[1])), 0.25);
    assert_eq!(profile.mass(&theta), 0.75);

    // (geo ⊕ content) ⊕ profile
    assert_eq!(out.combined.mass(&set(&[1])), 31.0 / 64.0);
    assert_eq!(out.combined.mass(&set(&[2])), 9.0 / 64.0);
    assert_eq!(out.combined.mass(&set(&[1, 2])), 12.0 / 64.0);
    assert_eq!(out.combined.mass(&theta), 12.0 / 64.0);
    assert_eq!(out.conflicts.len(), 2);

    // City3 appears only in Θ.
    assert_eq!(out.commonality[&3], 12.0 / 64.0);
}

#[test]
fn tie_between_two_locations() {
    let locs = cities();
    let est = LocationEstimator::new(&locs, EstimatorConfig::default()).unwrap();

    // geo:     {1}=1/4, {2}=1/4, Θ=2/4
    // content: {1}=1/4, {2}=1/4, {1,2}=1/4, Θ=1/4
    // profile: {1}=1/4, {2}=1/4, Θ=2/4
    let cluster = vec![
        msg(0, "lorem ipsum city1 city2", 0.0, 0.0, "city1"),
        msg(1, "lorem ipsum City2", 1.5, 0.5, "city2 lorem ipsum"),
        msg(2, "city1", 2.5, 0.5, "lorem ipsum"),
        msg(3, "", 0.0, 0.0, ""),
    ];

    let best = est.estimate(&cluster).unwrap();
    assert_eq!(best.len(), 2);
    let c1 = best.iter().find(|s| s.location_id == 1).expect("city1 tied");
    let c2 = best.iter().find(|s| s.location_id == 2).expect("city2 tied");
    assert!((c1.commonality - 0.671875).abs() < 1e-15);
    assert!((c2.commonality - 0.671875).abs() < 1e-15);
}

#[test]
fn tie_survives_exact_equality_mode() {
    let locs = cities();
    let cfg = EstimatorConfig::from_toml_str("[estimator]\ntie_epsilon = 0.0\n").unwrap();
    let est = LocationEstimator::new(&locs, cfg).unwrap();
    let cluster = vec![
        msg(0, "lorem ipsum city1 city2", 0.0, 0.0, "city1"),
        msg(1, "lorem ipsum City2", 1.5, 0.5, "city2 lorem ipsum"),
        msg(2, "city1", 2.5, 0.5, "lorem ipsum"),
        msg(3, "", 0.0, 0.0, ""),
    ];
    assert_eq!(est.estimate(&cluster).unwrap().len(), 2);
}

#[test]
fn channels_combine_left_to_right() {
    // geo {1}, content {2}, profile {2,3}:
    //   (geo ⊕ content) ⊕ profile = {1,2} ⊕ {2,3} = {2}
    //   geo ⊕ (content ⊕ profile) = {1} ⊕ {2}     = {1,2}
    let locs = cities();
    let est = LocationEstimator::new(&locs, EstimatorConfig::default()).unwrap();
    let cluster = vec![msg(0, "city2", 1.5, 0.5, "city2 city3")];

    let out = est.estimate_detailed(&cluster).unwrap();
    let geo = &out.channels[0].assignment;
    let content = &out.channels[1].assignment;
    let profile = &out.channels[2].assignment;

    let left = combine_dubois_prade(&combine_dubois_prade(geo, content), profile);
    let right = combine_dubois_prade(geo, &combine_dubois_prade(content, profile));
    assert_ne!(left, right);
    assert_eq!(out.combined, left);

    assert_eq!(out.best.len(), 1);
    assert_eq!(out.best[0].location_id, 2);
    assert_eq!(out.best[0].commonality, 1.0);
}

#[test]
fn empty_cluster_yields_no_result() {
    let locs = cities();
    let est = LocationEstimator::new(&locs, EstimatorConfig::default()).unwrap();
    assert!(est.estimate(&[]).unwrap().is_empty());
    let out = est.estimate_detailed(&[]).unwrap();
    assert!(out.combined.is_empty());
    assert!(out.commonality.is_empty());
}

#[test]
fn cluster_without_any_evidence_yields_no_result() {
    let locs = cities();
    let est = LocationEstimator::new(&locs, EstimatorConfig::default()).unwrap();
    let cluster = vec![Message::new(0).content("lorem ipsum"), Message::new(1)];

    let out = est.estimate_detailed(&cluster).unwrap();
    assert!(out.best.is_empty());
    // Everything sits on Θ.
    assert_eq!(out.combined.len(), 1);
    assert_eq!(out.commonality.len(), 10);
    assert!(out.commonality.values().all(|v| *v == 1.0));
}

#[test]
fn missing_region_is_fatal() {
    let mut locs = cities();
    locs.push(Location::without_region(11, "city11"));
    let est = LocationEstimator::new(&locs, EstimatorConfig::default()).unwrap();

    let cluster = vec![Message::new(0).content("city11")];
    assert_eq!(
        est.estimate(&cluster).unwrap_err(),
        EstimateError::MissingRegion { location_id: 11 }
    );
    // Also for an empty cluster: the universe itself is defective.
    assert!(est.estimate(&[]).is_err());
}

#[test]
fn duplicate_location_ids_are_rejected() {
    let mut locs = cities();
    locs.push(city(3));
    let err = LocationEstimator::new(&locs, EstimatorConfig::default()).unwrap_err();
    assert_eq!(err, EstimateError::DuplicateLocationId { location_id: 3 });
}

#[test]
fn empty_universe_is_rejected() {
    let err = LocationEstimator::new(&[], EstimatorConfig::default()).unwrap_err();
    assert_eq!(err, EstimateError::EmptyUniverse);
}

#[test]
fn non_ascii_names_match_across_case() {
    let x = 1.0;
    let locs = vec![
        Location::new(
            34,
            "İstanbul",
            polygon![(x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0)],
        ),
        city(2),
    ];
    let est = LocationEstimator::new(&locs, EstimatorConfig::default()).unwrap();
    let cluster = vec![
        Message::new(0).content("ISTANBUL"),
        Message::new(1).profile("istanbul"),
    ];
    let best = est.estimate(&cluster).unwrap();
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].location_id, 34);
}

#[test]
fn estimator_is_shareable_across_threads() {
    let locs = cities();
    let est = LocationEstimator::new(&locs, EstimatorConfig::default()).unwrap();
    let cluster = vec![
        msg(0, "lorem ipsum city1 city2", 0.0, 0.0, "city1"),
        msg(1, "lorem ipsum", 1.5, 0.5, "lorem ipsum"),
        msg(2, "city1", 2.5, 0.5, "lorem ipsum"),
        msg(3, "", 0.0, 0.0, ""),
    ];

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| est.estimate(&cluster).unwrap()))
            .collect();
        for h in handles {
            let best = h.join().unwrap();
            assert_eq!(best[0].location_id, 1);
            assert_eq!(best[0].commonality, 0.859375);
        }
    });
}
