//! Serializable sweep reports.

use crate::classify::Verdict;
use crate::config::{SerializableConfig, SweepConfig};
use crate::events::TimestampedEvent;
use crate::exec::BinarySizes;
use crate::harness::{PointResult, SweepOutcome};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete record of a sweep, written with `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRecord {
    pub config: SerializableConfig,
    pub points: Vec<PointRecord>,
    /// The rendered matrix, one string of verdict codes per depth.
    pub matrix: Vec<String>,
    pub events: Vec<TimestampedEvent>,
    pub metadata: RunMetadata,
}

impl SweepRecord {
    pub fn new(config: &SweepConfig, outcome: &SweepOutcome, events: Vec<TimestampedEvent>) -> Self {
        Self {
            config: config.to_serializable(),
            points: outcome.points.iter().map(PointRecord::from).collect(),
            matrix: outcome.matrix.code_rows(),
            events,
            metadata: RunMetadata::new(outcome.duration.as_millis() as u64),
        }
    }

    /// Export to a JSON file.
    pub fn export_to_file(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub depth: u32,
    pub error_percent: u32,
    pub error_code_us: u64,
    pub exception_us: u64,
    pub ratio: f64,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code_size: Option<BinarySizes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_size: Option<BinarySizes>,
}

impl From<&PointResult> for PointRecord {
    fn from(point: &PointResult) -> Self {
        Self {
            depth: point.depth,
            error_percent: point.error_percent,
            error_code_us: point.error_code.as_micros() as u64,
            exception_us: point.exception.as_micros() as u64,
            // JSON has no infinity.
            ratio: if point.classification.ratio.is_finite() {
                point.classification.ratio
            } else {
                f64::MAX
            },
            verdict: point.classification.verdict,
            error_code_size: point.sizes.map(|s| s.error_code),
            exception_size: point.sizes.map(|s| s.exception),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub timestamp: String,
    pub duration_ms: u64,
    pub platform: String,
}

impl RunMetadata {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            timestamp: unix_timestamp(),
            duration_ms,
            platform: std::env::consts::OS.to_string(),
        }
    }
}

/// Seconds since the Unix epoch.
fn unix_timestamp() -> String {
    use std::time::SystemTime;
    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_secs())
}
