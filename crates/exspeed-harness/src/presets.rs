//! Predefined sweeps.

use crate::config::SweepConfig;
use crate::scale::LogScale;

/// Collection of preset configurations.
pub struct Presets;

impl Presets {
    /// Two shallow depths, three error rates. Finishes in seconds.
    pub fn quick() -> SweepConfig {
        SweepConfig::minimal()
            .with_depths([50, 100])
            .with_error_percents([0, 1, 5])
            .with_rounds(1000)
            .with_trials(3)
    }

    /// Decade depths against the error rates where the crossover usually is.
    pub fn standard() -> SweepConfig {
        SweepConfig::minimal()
            .with_depths(LogScale::DECADES.values())
            .with_error_percents([0, 1, 2, 5, 10, 20, 50])
            .with_rounds(10_000)
            .with_trials(5)
    }

    /// Long chains, where unwinding cost grows with the number of frames.
    pub fn deep() -> SweepConfig {
        SweepConfig::minimal()
            .with_depths([1000, 2000, 5000])
            .with_error_percents([0, 1, 10, 50])
            .with_rounds(10_000)
            .with_trials(5)
    }

    pub fn all() -> Vec<(&'static str, SweepConfig)> {
        vec![
            ("quick", Self::quick()),
            ("standard", Self::standard()),
            ("deep", Self::deep()),
        ]
    }

    pub fn by_name(name: &str) -> Option<SweepConfig> {
        Self::all()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, config)| config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_valid() {
        for (name, config) in Presets::all() {
            assert!(config.validate().is_ok(), "preset '{}' is invalid", name);
        }
    }

    #[test]
    fn test_by_name() {
        assert_eq!(Presets::by_name("standard").unwrap().depths, vec![10, 100, 1000]);
        assert!(Presets::by_name("missing").is_none());
    }
}
