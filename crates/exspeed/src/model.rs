//! Reference evaluation of the generated programs.
//!
//! [`simulate`] walks the same [`CallGraph`] with the same random stream and
//! draw order as the emitted entry points, so its [`Tally`] is exactly what
//! either compiled program prints.

use crate::graph::{CallGraph, NodeKind, FAN_OUT};
use crate::rng::SplitMix64;
use crate::spec::GraphSpec;
use serde::{Deserialize, Serialize};

/// Success and failure counts printed by a generated program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    pub ok: u32,
    pub fail: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed tally output: {0:?}")]
pub struct TallyParseError(pub String);

impl Tally {
    pub fn rounds(&self) -> u32 {
        self.ok + self.fail
    }

    /// Parse the `OK: <n>` / `Fail: <m>` lines printed on completion.
    pub fn parse(stdout: &str) -> Result<Self, TallyParseError> {
        let mut ok = None;
        let mut fail = None;
        for line in stdout.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("OK:") {
                ok = rest.trim().parse().ok();
            } else if let Some(rest) = line.strip_prefix("Fail:") {
                fail = rest.trim().parse().ok();
            }
        }
        match (ok, fail) {
            (Some(ok), Some(fail)) => Ok(Self { ok, fail }),
            _ => Err(TallyParseError(stdout.to_string())),
        }
    }
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OK: {}\nFail: {}", self.ok, self.fail)
    }
}

/// Predict the tally of both generated programs for `spec`.
pub fn simulate(spec: &GraphSpec) -> Tally {
    let graph = CallGraph::build(spec);
    let mut rng = SplitMix64::new(spec.seed());
    let mut tally = Tally::default();
    for _ in 0..spec.rounds() {
        if invoke(&graph, &mut rng) {
            tally.ok += 1;
        } else {
            tally.fail += 1;
        }
    }
    tally
}

/// One top-level call of node 0. Returns whether it succeeded.
fn invoke(graph: &CallGraph, rng: &mut SplitMix64) -> bool {
    let mut current = graph.entry();
    loop {
        // Successors are clamped to the terminal, so indexing cannot miss.
        match graph.nodes()[current.0 as usize].kind {
            NodeKind::Dispatch { successors } => {
                let selector = rng.below(FAN_OUT as u64) as usize;
                current = successors[selector];
            }
            NodeKind::Terminal { threshold } => {
                return rng.below(100) >= threshold as u64;
            }
        }
    }
}
