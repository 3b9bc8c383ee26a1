//! Harness events and the sinks that receive them.
//!
//! The harness reports progress as [`HarnessEvent`]s rather than logging
//! directly. [`TracingSink`] turns them into `tracing` records,
//! [`EventRecorder`] keeps them with timestamps for export, and
//! [`MultiplexSink`] fans out to several sinks at once.

use crate::classify::Verdict;
use exspeed::EmissionVariant;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HarnessEvent {
    PointStarted {
        depth: u32,
        error_percent: u32,
    },
    TreeGenerated {
        variant: EmissionVariant,
        files: usize,
        bytes: usize,
    },
    BuildFinished {
        variant: EmissionVariant,
        builder: String,
        duration_ms: u64,
    },
    TrialFinished {
        variant: EmissionVariant,
        trial: u32,
        elapsed_us: u64,
    },
    PointClassified {
        depth: u32,
        error_percent: u32,
        error_code_us: u64,
        exception_us: u64,
        ratio: f64,
        verdict: Verdict,
    },
    SweepFinished {
        points: usize,
        duration_ms: u64,
    },
}

/// Receiver of harness events.
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, event: HarnessEvent);

    /// Called once a sweep completes. The default does nothing.
    fn flush(&self) {}
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: HarnessEvent) {}
}

/// Forwards events to the `tracing` crate: trials and builds at `debug`,
/// point and sweep summaries at `info`.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: HarnessEvent) {
        match event {
            HarnessEvent::PointStarted {
                depth,
                error_percent,
            } => {
                tracing::info!(depth, error_percent, "measuring point");
            }
            HarnessEvent::TreeGenerated {
                variant,
                files,
                bytes,
            } => {
                tracing::debug!(%variant, files, bytes, "generated sources");
            }
            HarnessEvent::BuildFinished {
                variant,
                builder,
                duration_ms,
            } => {
                tracing::debug!(%variant, %builder, duration_ms, "build finished");
            }
            HarnessEvent::TrialFinished {
                variant,
                trial,
                elapsed_us,
            } => {
                tracing::debug!(%variant, trial, elapsed_us, "trial finished");
            }
            HarnessEvent::PointClassified {
                depth,
                error_percent,
                error_code_us,
                exception_us,
                ratio,
                verdict,
            } => {
                tracing::info!(
                    depth,
                    error_percent,
                    error_code_us,
                    exception_us,
                    ratio,
                    code = %verdict.code(),
                    "{}",
                    verdict
                );
            }
            HarnessEvent::SweepFinished {
                points,
                duration_ms,
            } => {
                tracing::info!(points, duration_ms, "sweep finished");
            }
        }
    }
}

/// Forwards every event to each child sink.
pub struct MultiplexSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl MultiplexSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for MultiplexSink {
    fn emit(&self, event: HarnessEvent) {
        for sink in &self.sinks {
            sink.emit(event.clone());
        }
    }

    fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}

/// Event with its offset from recorder creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedEvent {
    pub timestamp_us: u64,
    pub event: HarnessEvent,
}

/// Keeps every event in memory.
pub struct EventRecorder {
    events: Mutex<Vec<TimestampedEvent>>,
    start_time: Instant,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            start_time: Instant::now(),
        }
    }

    pub fn events(&self) -> Vec<TimestampedEvent> {
        self.events.lock().clone()
    }

    /// Take and clear all events.
    pub fn take(&self) -> Vec<TimestampedEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventRecorder {
    fn emit(&self, event: HarnessEvent) {
        let timestamp_us = self.start_time.elapsed().as_micros() as u64;
        self.events.lock().push(TimestampedEvent {
            timestamp_us,
            event,
        });
    }
}
