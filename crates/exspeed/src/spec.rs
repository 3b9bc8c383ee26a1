//! Generation parameters.

use crate::graph::FAN_OUT;
use serde::{Deserialize, Serialize};

/// Largest accepted depth; successor indices `index + FAN_OUT` stay in `u32`.
pub const MAX_DEPTH: u32 = u32::MAX - FAN_OUT;

/// Seed written into both entry points unless overridden.
pub const DEFAULT_SEED: u64 = 42;

/// Rejected [`GraphSpec`] parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// The failure probability must be a percentage.
    #[error("error percent {0} is outside [0, 100]")]
    ErrorPercentOutOfRange(u32),

    /// At least one round must be run.
    #[error("rounds must be at least 1")]
    ZeroRounds,

    /// Node indices would overflow.
    #[error("depth {0} exceeds the maximum supported depth")]
    DepthTooLarge(u32),

    /// The generated tallies are C `int`s.
    #[error("rounds {0} does not fit the generated program's int tally")]
    RoundsTooLarge(u32),
}

/// Immutable description of one generated workload.
///
/// `depth` is the number of internal nodes in front of the terminal node, so
/// a spec describes `depth + 1` nodes in total. `depth = 0` is allowed and
/// yields a graph with only the terminal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphSpec {
    depth: u32,
    rounds: u32,
    error_percent: u32,
    seed: u64,
}

impl GraphSpec {
    /// Validate and build a spec seeded with [`DEFAULT_SEED`].
    pub fn new(depth: u32, rounds: u32, error_percent: u32) -> Result<Self, SpecError> {
        if depth > MAX_DEPTH {
            return Err(SpecError::DepthTooLarge(depth));
        }
        if error_percent > 100 {
            return Err(SpecError::ErrorPercentOutOfRange(error_percent));
        }
        if rounds == 0 {
            return Err(SpecError::ZeroRounds);
        }
        if rounds > i32::MAX as u32 {
            return Err(SpecError::RoundsTooLarge(rounds));
        }
        Ok(Self {
            depth,
            rounds,
            error_percent,
            seed: DEFAULT_SEED,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn error_percent(&self) -> u32 {
        self.error_percent
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Index of the terminal node.
    pub fn terminal(&self) -> u32 {
        self.depth
    }

    /// Total node count, terminal included.
    pub fn node_count(&self) -> u32 {
        self.depth + 1
    }
}

impl Default for GraphSpec {
    /// The parameters of the classic single-point measurement.
    fn default() -> Self {
        Self {
            depth: 1000,
            rounds: 1000,
            error_percent: 1,
            seed: DEFAULT_SEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_spec() {
        let spec = GraphSpec::new(5, 1000, 1).unwrap();
        assert_eq!(spec.depth(), 5);
        assert_eq!(spec.node_count(), 6);
        assert_eq!(spec.terminal(), 5);
        assert_eq!(spec.seed(), DEFAULT_SEED);
    }

    #[test]
    fn test_zero_depth_allowed() {
        let spec = GraphSpec::new(0, 1, 0).unwrap();
        assert_eq!(spec.node_count(), 1);
    }

    #[test]
    fn test_error_percent_bounds() {
        assert!(GraphSpec::new(1, 1, 100).is_ok());
        assert_eq!(
            GraphSpec::new(1, 1, 101),
            Err(SpecError::ErrorPercentOutOfRange(101))
        );
    }

    #[test]
    fn test_rounds_bounds() {
        assert_eq!(GraphSpec::new(1, 0, 1), Err(SpecError::ZeroRounds));
        assert_eq!(
            GraphSpec::new(1, u32::MAX, 1),
            Err(SpecError::RoundsTooLarge(u32::MAX))
        );
        assert!(GraphSpec::new(1, i32::MAX as u32, 1).is_ok());
    }

    #[test]
    fn test_depth_bounds() {
        assert_eq!(
            GraphSpec::new(u32::MAX, 1, 1),
            Err(SpecError::DepthTooLarge(u32::MAX))
        );
        assert_eq!(
            GraphSpec::new(MAX_DEPTH + 1, 1, 1),
            Err(SpecError::DepthTooLarge(MAX_DEPTH + 1))
        );
        let spec = GraphSpec::new(MAX_DEPTH, 1, 1).unwrap();
        assert_eq!(spec.node_count(), MAX_DEPTH + 1);
    }

    #[test]
    fn test_with_seed() {
        let spec = GraphSpec::new(3, 10, 5).unwrap().with_seed(7);
        assert_eq!(spec.seed(), 7);
    }
}
