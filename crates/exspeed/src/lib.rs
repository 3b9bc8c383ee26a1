//! Paired workload generator for comparing error-propagation disciplines.
//!
//! This crate builds a deterministic call graph from a [`GraphSpec`] and
//! renders it twice:
//! - as a C++ program whose terminal node throws and whose callers unwind
//! - as a C program whose terminal node returns an error object that every
//!   caller checks explicitly
//!
//! Both programs consume one shared pseudo-random stream in the same order,
//! so they visit the same nodes and fail on the same rounds. [`simulate`]
//! evaluates that behavior in-process.
//!
//! # Example
//!
//! ```
//! use exspeed::{generate, simulate, GraphSpec};
//!
//! let spec = GraphSpec::new(5, 1000, 1).unwrap();
//! let (exception, error_code) = generate(&spec);
//! assert_eq!(exception.node_count(), 6);
//! assert_eq!(error_code.node_count(), 6);
//! assert_eq!(simulate(&spec).rounds(), 1000);
//! ```

pub mod emit;
mod graph;
mod model;
pub mod rng;
mod spec;
mod tree;

pub use emit::{generate, render, Backend, EmissionVariant};
pub use graph::{CallGraph, Node, NodeId, NodeKind, FAN_OUT};
pub use model::{simulate, Tally, TallyParseError};
pub use spec::{GraphSpec, SpecError, DEFAULT_SEED, MAX_DEPTH};
pub use tree::{FileKind, SourceFile, SourceTree};
