//! Demo: estimate every cluster in a JSON dataset and print one JSON line per cluster.
//!
//! Usage: `estimate_demo <dataset.json>`
//! Logging: `RUST_LOG=estimator=debug` shows per-channel and per-step details.

use std::path::PathBuf;

use anyhow::Context;
use evidential_geolocator::{dataset::Dataset, EstimatorConfig, LocationEstimator};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Serialize)]
struct ClusterLine<'a> {
    cluster: usize,
    messages: usize,
    best: &'a [evidential_geolocator::LocationScore],
    conflicts: &'a [f64],
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("estimator=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev (ESTIMATOR_CONFIG_PATH, RUST_LOG, ...).
    let _ = dotenvy::dotenv();
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: estimate_demo <dataset.json>")?;

    let cfg = EstimatorConfig::from_toml()?;
    let dataset = Dataset::load(&path)?;
    let estimator = LocationEstimator::new(&dataset.locations, cfg)?;
    info!(
        target: "estimator",
        locations = dataset.locations.len(),
        clusters = dataset.clusters.len(),
        tie_epsilon = cfg.tie_epsilon,
        "dataset loaded"
    );

    for (i, cluster) in dataset.clusters.iter().enumerate() {
        let est = estimator
            .estimate_detailed(cluster)
            .with_context(|| format!("estimating cluster {i}"))?;
        let line = ClusterLine {
            cluster: i,
            messages: est.cluster_size,
            best: &est.best,
            conflicts: &est.conflicts,
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    Ok(())
}
