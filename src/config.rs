// src/config.rs
//! Estimator tuning loaded from TOML.
//!
//! ```toml
//! [estimator]
//! tie_epsilon = 1e-9
//! mass_tolerance = 1e-9
//! ```
//!
//! Path: `ESTIMATOR_CONFIG_PATH` or `config/estimator.toml`. A missing default
//! file means defaults; a missing file named by the env var is an error.
//! `ESTIMATOR_TIE_EPSILON` overrides the tie epsilon from the file.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_ESTIMATOR_CONFIG_PATH: &str = "config/estimator.toml";
pub const DEFAULT_TIE_EPSILON: f64 = 1e-9;
pub const DEFAULT_MASS_TOLERANCE: f64 = 1e-9;

pub const ENV_ESTIMATOR_CONFIG_PATH: &str = "ESTIMATOR_CONFIG_PATH";
pub const ENV_ESTIMATOR_TIE_EPSILON: &str = "ESTIMATOR_TIE_EPSILON";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EstimatorConfig {
    /// Scores within this distance of the maximum count as tied. `0.0` means exact equality.
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f64,
    /// Allowed deviation of a channel assignment's total from 1.
    #[serde(default = "default_mass_tolerance")]
    pub mass_tolerance: f64,
}

fn default_tie_epsilon() -> f64 {
    DEFAULT_TIE_EPSILON
}

fn default_mass_tolerance() -> f64 {
    DEFAULT_MASS_TOLERANCE
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            tie_epsilon: DEFAULT_TIE_EPSILON,
            mass_tolerance: DEFAULT_MASS_TOLERANCE,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigRoot {
    #[serde(default)]
    estimator: Option<EstimatorConfig>,
}

// parse optional non-negative float env
fn parse_epsilon_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

impl EstimatorConfig {
    /// Load from the configured TOML path, then apply env overrides.
    pub fn from_toml() -> anyhow::Result<Self> {
        let (path, explicit) = match std::env::var(ENV_ESTIMATOR_CONFIG_PATH) {
            Ok(p) => (PathBuf::from(p), true),
            Err(_) => (PathBuf::from(DEFAULT_ESTIMATOR_CONFIG_PATH), false),
        };

        let mut cfg = if !explicit && !path.exists() {
            Self::default()
        } else {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading estimator config from {}", path.display()))?;
            Self::from_toml_str(&content)
                .with_context(|| format!("parsing estimator config at {}", path.display()))?
        };

        if let Some(eps) = parse_epsilon_env(std::env::var(ENV_ESTIMATOR_TIE_EPSILON).ok()) {
            cfg.tie_epsilon = eps;
        }
        Ok(cfg)
    }

    /// Parse a TOML string; a missing `[estimator]` table yields defaults.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let root: ConfigRoot = toml::from_str(toml_str)?;
        Ok(root.estimator.unwrap_or_default().sanitized())
    }

    /// Replace non-finite or negative values with defaults.
    pub fn sanitized(mut self) -> Self {
        if !self.tie_epsilon.is_finite() || self.tie_epsilon < 0.0 {
            self.tie_epsilon = DEFAULT_TIE_EPSILON;
        }
        if !self.mass_tolerance.is_finite() || self.mass_tolerance < 0.0 {
            self.mass_tolerance = DEFAULT_MASS_TOLERANCE;
        }
        self
    }
}
