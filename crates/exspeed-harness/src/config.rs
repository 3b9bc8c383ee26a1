//! Sweep configuration.

use crate::classify::DEFAULT_MARGINAL_THRESHOLD;
use crate::error::{HarnessError, Result};
use exspeed::{GraphSpec, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete configuration for a sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    // === Axes ===
    /// Graph depths, one matrix row each, in report order.
    pub depths: Vec<u32>,

    /// Error percents, one matrix column each, in report order.
    pub error_percents: Vec<u32>,

    // === Measurement ===
    /// Top-level invocations compiled into every program.
    pub rounds_per_trial: u32,

    /// Timed runs per executable; only the fastest is kept.
    pub trials_per_point: u32,

    /// Relative difference below which a verdict is marginal.
    pub marginal_threshold: f64,

    /// Seed baked into both entry points.
    pub seed: u64,

    // === Artifacts ===
    /// Parent of the per-point working directories.
    pub work_dir: PathBuf,

    /// Leave each point's sources and binaries on disk after success.
    pub keep_artifacts: bool,

    /// Also record stripped and unstripped executable sizes.
    pub inspect_sizes: bool,

    /// Tool used when `inspect_sizes` is set.
    pub strip_program: String,

    /// Check every run's printed tally against the reference model.
    pub verify_tallies: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::minimal()
    }
}

impl SweepConfig {
    /// A single small point, useful for smoke tests.
    pub fn minimal() -> Self {
        Self {
            depths: vec![10],
            error_percents: vec![1],
            rounds_per_trial: 1000,
            trials_per_point: 3,
            marginal_threshold: DEFAULT_MARGINAL_THRESHOLD,
            seed: DEFAULT_SEED,
            work_dir: PathBuf::from("./tmp/exspeed"),
            keep_artifacts: false,
            inspect_sizes: false,
            strip_program: "strip".to_string(),
            verify_tallies: false,
        }
    }

    // === Builder methods ===

    pub fn with_depths(mut self, depths: impl IntoIterator<Item = u32>) -> Self {
        self.depths = depths.into_iter().collect();
        self
    }

    pub fn with_error_percents(mut self, percents: impl IntoIterator<Item = u32>) -> Self {
        self.error_percents = percents.into_iter().collect();
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds_per_trial = rounds;
        self
    }

    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials_per_point = trials;
        self
    }

    pub fn with_marginal_threshold(mut self, threshold: f64) -> Self {
        self.marginal_threshold = threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_keep_artifacts(mut self, keep: bool) -> Self {
        self.keep_artifacts = keep;
        self
    }

    pub fn with_size_inspection(mut self, enabled: bool) -> Self {
        self.inspect_sizes = enabled;
        self
    }

    pub fn with_strip_program(mut self, program: impl Into<String>) -> Self {
        self.strip_program = program.into();
        self
    }

    pub fn with_tally_verification(mut self, enabled: bool) -> Self {
        self.verify_tallies = enabled;
        self
    }

    /// Number of parameter points in the sweep.
    pub fn point_count(&self) -> usize {
        self.depths.len() * self.error_percents.len()
    }

    /// The workload spec for one point.
    pub fn graph_spec(&self, depth: u32, error_percent: u32) -> Result<GraphSpec> {
        Ok(GraphSpec::new(depth, self.rounds_per_trial, error_percent)?.with_seed(self.seed))
    }

    /// Reject configurations that could not produce a complete matrix.
    ///
    /// Every point's [`GraphSpec`] is validated here, so a bad error percent
    /// fails before anything is built.
    pub fn validate(&self) -> Result<()> {
        if self.depths.is_empty() {
            return Err(HarnessError::EmptySweep("depths"));
        }
        if self.error_percents.is_empty() {
            return Err(HarnessError::EmptySweep("error percents"));
        }
        if self.trials_per_point == 0 {
            return Err(HarnessError::InvalidConfig(
                "trials per point must be at least 1".to_string(),
            ));
        }
        if !self.marginal_threshold.is_finite() || self.marginal_threshold < 0.0 {
            return Err(HarnessError::InvalidConfig(format!(
                "marginal threshold {} must be a non-negative number",
                self.marginal_threshold
            )));
        }
        for &depth in &self.depths {
            for &percent in &self.error_percents {
                self.graph_spec(depth, percent)?;
            }
        }
        Ok(())
    }

    /// Convert to a serializable form for recording.
    pub fn to_serializable(&self) -> SerializableConfig {
        SerializableConfig {
            depths: self.depths.clone(),
            error_percents: self.error_percents.clone(),
            rounds_per_trial: self.rounds_per_trial,
            trials_per_point: self.trials_per_point,
            marginal_threshold: self.marginal_threshold,
            seed: self.seed,
        }
    }
}

/// Serializable configuration for recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableConfig {
    pub depths: Vec<u32>,
    pub error_percents: Vec<u32>,
    pub rounds_per_trial: u32,
    pub trials_per_point: u32,
    pub marginal_threshold: f64,
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use exspeed::SpecError;

    #[test]
    fn test_minimal_is_valid() {
        assert!(SweepConfig::minimal().validate().is_ok());
        assert_eq!(SweepConfig::default().point_count(), 1);
    }

    #[test]
    fn test_empty_axes_rejected() {
        let config = SweepConfig::minimal().with_depths([]);
        assert!(matches!(
            config.validate(),
            Err(HarnessError::EmptySweep("depths"))
        ));
        let config = SweepConfig::minimal().with_error_percents([]);
        assert!(matches!(
            config.validate(),
            Err(HarnessError::EmptySweep("error percents"))
        ));
    }

    #[test]
    fn test_out_of_range_percent_rejected() {
        let config = SweepConfig::minimal().with_error_percents([0, 5, 150]);
        assert!(matches!(
            config.validate(),
            Err(HarnessError::Spec(SpecError::ErrorPercentOutOfRange(150)))
        ));
    }

    #[test]
    fn test_trials_and_threshold_checked() {
        assert!(SweepConfig::minimal().with_trials(0).validate().is_err());
        assert!(SweepConfig::minimal()
            .with_marginal_threshold(f64::NAN)
            .validate()
            .is_err());
        assert!(SweepConfig::minimal()
            .with_marginal_threshold(-0.1)
            .validate()
            .is_err());
        assert!(SweepConfig::minimal()
            .with_marginal_threshold(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_graph_spec_carries_seed_and_rounds() {
        let config = SweepConfig::minimal().with_seed(7).with_rounds(55);
        let spec = config.graph_spec(3, 9).unwrap();
        assert_eq!(spec.seed(), 7);
        assert_eq!(spec.rounds(), 55);
        assert_eq!(spec.error_percent(), 9);
    }

    #[test]
    fn test_serializable_snapshot() {
        let config = SweepConfig::minimal()
            .with_depths([50, 100])
            .with_error_percents([0, 5]);
        let snapshot = config.to_serializable();
        assert_eq!(snapshot.depths, vec![50, 100]);
        assert_eq!(snapshot.error_percents, vec![0, 5]);
        assert_eq!(config.point_count(), 4);
    }
}
