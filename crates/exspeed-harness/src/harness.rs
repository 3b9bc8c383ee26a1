//! The sweep driver: generate, build, time and classify each point.

use crate::build::Builder;
use crate::classify::{classify, Classification};
use crate::config::SweepConfig;
use crate::error::{HarnessError, Result};
use crate::events::{EventSink, HarnessEvent, TracingSink};
use crate::exec::{inspect_sizes, BinarySizes, ProgramRunner, SystemRunner};
use crate::matrix::{MatrixBuilder, ResultMatrix};
use crate::workdir::PointDir;
use exspeed::{generate, simulate, EmissionVariant, SourceTree, Tally};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Executable sizes of both programs at one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointSizes {
    pub error_code: BinarySizes,
    pub exception: BinarySizes,
}

/// Measurement of one `(depth, error_percent)` point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointResult {
    pub depth: u32,
    pub error_percent: u32,
    /// Fastest of N runs of the error-code program.
    pub error_code: Duration,
    /// Fastest of N runs of the exception program.
    pub exception: Duration,
    pub classification: Classification,
    pub sizes: Option<PointSizes>,
    /// Set when the point's directory was kept on disk.
    pub artifacts: Option<PathBuf>,
}

/// Result of a complete sweep.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub matrix: ResultMatrix,
    /// Every point, row-major in sweep order.
    pub points: Vec<PointResult>,
    pub duration: Duration,
}

/// Drives a sweep with a pluggable build step and process runner.
///
/// Points are measured strictly one after another so that no two timed
/// programs ever share the machine.
pub struct Harness<B, R = SystemRunner> {
    config: SweepConfig,
    builder: B,
    runner: R,
    sink: Arc<dyn EventSink>,
}

impl<B: Builder> Harness<B, SystemRunner> {
    pub fn new(config: SweepConfig, builder: B) -> Self {
        Self::with_runner(config, builder, SystemRunner)
    }
}

impl<B: Builder, R: ProgramRunner> Harness<B, R> {
    pub fn with_runner(config: SweepConfig, builder: B, runner: R) -> Self {
        Self {
            config,
            builder,
            runner,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the default [`TracingSink`].
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Measure every point and assemble the verdict matrix.
    ///
    /// The configuration is validated up front. The first failing point
    /// aborts the sweep and no partial matrix is returned.
    pub fn sweep(&self) -> Result<SweepOutcome> {
        self.config.validate()?;
        let start = Instant::now();

        let mut matrix = MatrixBuilder::new(
            self.config.depths.clone(),
            self.config.error_percents.clone(),
        );
        let mut points = Vec::with_capacity(self.config.point_count());
        for &depth in &self.config.depths {
            let mut row = Vec::with_capacity(self.config.error_percents.len());
            for &error_percent in &self.config.error_percents {
                let point = self.measure_point(depth, error_percent)?;
                row.push(point.classification.verdict);
                points.push(point);
            }
            matrix.push_row(row)?;
        }
        let matrix = matrix.finish()?;

        let duration = start.elapsed();
        self.sink.emit(HarnessEvent::SweepFinished {
            points: points.len(),
            duration_ms: duration.as_millis() as u64,
        });
        self.sink.flush();

        Ok(SweepOutcome {
            matrix,
            points,
            duration,
        })
    }

    /// Generate, build and time both programs for a single point.
    pub fn measure_point(&self, depth: u32, error_percent: u32) -> Result<PointResult> {
        let spec = self.config.graph_spec(depth, error_percent)?;
        self.sink.emit(HarnessEvent::PointStarted {
            depth,
            error_percent,
        });

        let (exception_tree, error_code_tree) = generate(&spec);
        let dir = PointDir::acquire(
            &self.config.work_dir,
            &format!("depth{}_err{}", depth, error_percent),
        )?;

        let error_code_exe = self.materialize(&dir, &error_code_tree)?;
        let exception_exe = self.materialize(&dir, &exception_tree)?;

        let expected = self.config.verify_tallies.then(|| simulate(&spec));
        let error_code = self.time_program(&error_code_tree, &error_code_exe, expected)?;
        let exception = self.time_program(&exception_tree, &exception_exe, expected)?;

        let sizes = if self.config.inspect_sizes {
            Some(PointSizes {
                error_code: inspect_sizes(&error_code_exe, &self.config.strip_program)?,
                exception: inspect_sizes(&exception_exe, &self.config.strip_program)?,
            })
        } else {
            None
        };

        let classification = classify(error_code, exception, self.config.marginal_threshold);
        self.sink.emit(HarnessEvent::PointClassified {
            depth,
            error_percent,
            error_code_us: error_code.as_micros() as u64,
            exception_us: exception.as_micros() as u64,
            ratio: classification.ratio,
            verdict: classification.verdict,
        });

        let artifacts = if self.config.keep_artifacts {
            let root = dir.keep();
            info!(root = %root.display(), "kept point artifacts");
            Some(root)
        } else {
            dir.release()?;
            None
        };

        Ok(PointResult {
            depth,
            error_percent,
            error_code,
            exception,
            classification,
            sizes,
            artifacts,
        })
    }

    /// Write `tree` into its source directory and build it.
    fn materialize(&self, dir: &PointDir, tree: &SourceTree) -> Result<PathBuf> {
        let src_dir = dir.src_dir(tree.variant);
        tree.write_to(&src_dir)
            .map_err(|e| HarnessError::io(&src_dir, e))?;
        self.sink.emit(HarnessEvent::TreeGenerated {
            variant: tree.variant,
            files: tree.files.len(),
            bytes: tree.total_bytes(),
        });

        let start = Instant::now();
        let executable = self
            .builder
            .build(tree, &src_dir, &dir.build_dir(tree.variant))?;
        self.sink.emit(HarnessEvent::BuildFinished {
            variant: tree.variant,
            builder: self.builder.name().to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        });
        Ok(executable)
    }

    fn time_program(
        &self,
        tree: &SourceTree,
        executable: &Path,
        expected: Option<Tally>,
    ) -> Result<Duration> {
        min_of_n(self.config.trials_per_point, |trial| {
            let output = self.runner.run(executable, &[])?;
            if let Some(expected) = expected {
                verify_tally(tree.variant, expected, &output.stdout)?;
            }
            self.sink.emit(HarnessEvent::TrialFinished {
                variant: tree.variant,
                trial,
                elapsed_us: output.elapsed.as_micros() as u64,
            });
            Ok(output.elapsed)
        })
    }
}

/// Run `trial` `trials` times and keep the smallest timing.
///
/// The first error stops sampling and is returned as is.
pub fn min_of_n<F>(trials: u32, mut trial: F) -> Result<Duration>
where
    F: FnMut(u32) -> Result<Duration>,
{
    if trials == 0 {
        return Err(HarnessError::InvalidConfig(
            "trials per point must be at least 1".to_string(),
        ));
    }
    let mut best = Duration::MAX;
    for index in 0..trials {
        best = best.min(trial(index)?);
    }
    Ok(best)
}

fn verify_tally(variant: EmissionVariant, expected: Tally, stdout: &str) -> Result<()> {
    match Tally::parse(stdout) {
        Ok(actual) if actual == expected => Ok(()),
        Ok(actual) => Err(HarnessError::TallyMismatch {
            variant,
            expected,
            actual: Some(actual),
        }),
        Err(_) => Err(HarnessError::TallyMismatch {
            variant,
            expected,
            actual: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_of_n_keeps_minimum() {
        let samples = [30, 10, 20, 15];
        let best = min_of_n(4, |i| Ok(Duration::from_millis(samples[i as usize]))).unwrap();
        assert_eq!(best, Duration::from_millis(10));
    }

    #[test]
    fn test_min_of_n_single_trial() {
        let best = min_of_n(1, |_| Ok(Duration::from_micros(7))).unwrap();
        assert_eq!(best, Duration::from_micros(7));
    }

    #[test]
    fn test_min_of_n_stops_on_error() {
        let mut calls = 0;
        let result = min_of_n(5, |i| {
            calls += 1;
            if i == 2 {
                Err(HarnessError::InvalidConfig("boom".into()))
            } else {
                Ok(Duration::from_millis(1))
            }
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_min_of_n_rejects_zero_trials() {
        assert!(min_of_n(0, |_| Ok(Duration::ZERO)).is_err());
    }

    #[test]
    fn test_verify_tally() {
        let expected = Tally { ok: 9, fail: 1 };
        assert!(verify_tally(EmissionVariant::ErrorCodeStyle, expected, "OK: 9\nFail: 1\n").is_ok());
        assert!(matches!(
            verify_tally(EmissionVariant::ErrorCodeStyle, expected, "OK: 8\nFail: 2\n"),
            Err(HarnessError::TallyMismatch {
                actual: Some(Tally { ok: 8, fail: 2 }),
                ..
            })
        ));
        assert!(matches!(
            verify_tally(EmissionVariant::ExceptionStyle, expected, "garbage"),
            Err(HarnessError::TallyMismatch { actual: None, .. })
        ));
    }
}
