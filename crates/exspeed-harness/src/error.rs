//! Error types for building, running and classifying workloads.

use exspeed::{EmissionVariant, SpecError, Tally};
use std::path::PathBuf;

/// Every failure that aborts a measurement.
///
/// None of these are retried: a build or execution failure stops the whole
/// sweep, and no partial matrix is produced.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A point's parameters were rejected before generation.
    #[error("invalid workload parameters: {0}")]
    Spec(#[from] SpecError),

    /// Materializing sources or managing a work directory failed.
    #[error("i/o error at {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An external tool could not be started at all.
    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The external build step rejected the generated sources.
    #[error("{variant} build failed: `{command}` exited with {status}\n{stderr}")]
    BuildFailed {
        variant: EmissionVariant,
        command: String,
        status: String,
        stderr: String,
    },

    /// The build reported success but left no executable behind.
    #[error("build produced no executable at {}", .0.display())]
    MissingArtifact(PathBuf),

    /// A generated program (or helper tool) exited unsuccessfully.
    #[error("`{program}` exited with {status}\n{stderr}")]
    ExecutionFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// A program's printed tally disagreed with the reference model.
    #[error("{variant} program printed {actual:?}, expected {expected:?}")]
    TallyMismatch {
        variant: EmissionVariant,
        expected: Tally,
        actual: Option<Tally>,
    },

    /// A sweep axis has no values.
    #[error("sweep has no {0}")]
    EmptySweep(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rows handed to the matrix do not match its axes.
    #[error("result matrix shape mismatch: {0}")]
    MatrixShape(String),
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_source_not_repeated_in_message() {
        let err = HarnessError::io(
            "/tmp/point",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        );
        assert_eq!(err.to_string(), "i/o error at /tmp/point");
        assert_eq!(err.source().unwrap().to_string(), "no such directory");
    }

    #[test]
    fn test_spawn_source_not_repeated_in_message() {
        let err = HarnessError::Spawn {
            program: "ninja".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
        };
        assert_eq!(err.to_string(), "failed to start `ninja`");
        assert_eq!(err.source().unwrap().to_string(), "not installed");
    }
}
