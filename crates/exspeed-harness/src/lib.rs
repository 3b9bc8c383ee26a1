//! Build, time and classify paired exception / error-code workloads.
//!
//! A [`Harness`] walks every `(depth, error_percent)` point of a
//! [`SweepConfig`]. For each point it generates both programs with
//! [`exspeed::generate`], builds them through a [`Builder`], times each with
//! a min-of-N sample through a [`ProgramRunner`] and reduces the two timings
//! to a [`Verdict`]. The verdicts form a [`ResultMatrix`].
//!
//! ```no_run
//! use exspeed_harness::{Harness, MesonBuilder, Presets};
//!
//! let harness = Harness::new(Presets::quick(), MesonBuilder::default());
//! let outcome = harness.sweep()?;
//! print!("{}", outcome.matrix);
//! # Ok::<(), exspeed_harness::HarnessError>(())
//! ```

mod build;
mod classify;
mod config;
mod error;
mod events;
mod exec;
mod harness;
mod matrix;
mod presets;
mod record;
mod scale;
mod workdir;

pub use build::{Builder, DirectBuilder, MesonBuilder};
pub use classify::{classify, Classification, Verdict, DEFAULT_MARGINAL_THRESHOLD};
pub use config::{SerializableConfig, SweepConfig};
pub use error::{HarnessError, Result};
pub use events::{
    EventRecorder, EventSink, HarnessEvent, MultiplexSink, NullSink, TimestampedEvent,
    TracingSink,
};
pub use exec::{inspect_sizes, BinarySizes, ProgramRunner, RunOutput, SystemRunner};
pub use harness::{min_of_n, Harness, PointResult, PointSizes, SweepOutcome};
pub use matrix::{MatrixBuilder, ResultMatrix};
pub use presets::Presets;
pub use record::{PointRecord, RunMetadata, SweepRecord};
pub use scale::LogScale;
pub use workdir::PointDir;
