//! Rendering the call graph into buildable programs.
//!
//! Both error-handling disciplines render the same [`CallGraph`]. A
//! [`Backend`] only decides how a node, the entry point and a signature are
//! spelled; file layout, the shared header and the build descriptor are
//! produced here so the two programs cannot drift apart structurally.

mod error_code;
mod exception;

pub use error_code::ErrorCodeBackend;
pub use exception::ExceptionBackend;

use crate::graph::{CallGraph, NodeId, NodeKind, FAN_OUT};
use crate::rng;
use crate::spec::GraphSpec;
use crate::tree::{FileKind, SourceFile, SourceTree};
use serde::{Deserialize, Serialize};

/// File name of the shared interface header.
pub const INTERFACE_FILE: &str = "nodes.h";
/// File name of the build descriptor.
pub const BUILD_FILE: &str = "meson.build";
/// Meson project name written into both build descriptors.
pub const PROJECT_NAME: &str = "exceptionspeed";

/// Error-propagation discipline of a generated program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionVariant {
    /// Failures unwind through callers as C++ exceptions.
    ExceptionStyle,
    /// Failures travel back as a C out-parameter checked by every caller.
    ErrorCodeStyle,
}

impl EmissionVariant {
    pub const ALL: [EmissionVariant; 2] = [
        EmissionVariant::ExceptionStyle,
        EmissionVariant::ErrorCodeStyle,
    ];

    pub fn backend(self) -> &'static dyn Backend {
        match self {
            EmissionVariant::ExceptionStyle => &ExceptionBackend,
            EmissionVariant::ErrorCodeStyle => &ErrorCodeBackend,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EmissionVariant::ExceptionStyle => "exception",
            EmissionVariant::ErrorCodeStyle => "error_code",
        }
    }

    /// Directory the program's sources are written to.
    pub fn dir_name(self) -> &'static str {
        match self {
            EmissionVariant::ExceptionStyle => "cpp",
            EmissionVariant::ErrorCodeStyle => "plainc",
        }
    }
}

impl std::fmt::Display for EmissionVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Target-language spelling of one error-handling discipline.
pub trait Backend: Send + Sync {
    fn variant(&self) -> EmissionVariant;

    /// Meson language identifier (`c`, `cpp`).
    fn language(&self) -> &'static str;

    fn source_extension(&self) -> &'static str;

    fn executable_name(&self) -> &'static str;

    /// Declaration of a node function, without the trailing `;`.
    fn signature(&self, node: NodeId) -> String;

    /// The `main` translation unit running `spec.rounds()` calls of node 0.
    fn render_entry(&self, spec: &GraphSpec, entry: NodeId) -> String;

    /// An internal node calling `successors[selector]`.
    fn render_dispatch(&self, node: NodeId, successors: &[NodeId; FAN_OUT as usize]) -> String;

    /// The terminal node failing when its draw is below `threshold`.
    fn render_terminal(&self, node: NodeId, threshold: u32) -> String;

    fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.source_extension())
    }
}

/// Render both programs for `spec`: exception style first, error code second.
pub fn generate(spec: &GraphSpec) -> (SourceTree, SourceTree) {
    let graph = CallGraph::build(spec);
    (
        render_graph(spec, &graph, EmissionVariant::ExceptionStyle),
        render_graph(spec, &graph, EmissionVariant::ErrorCodeStyle),
    )
}

/// Render a single program for `spec`.
pub fn render(spec: &GraphSpec, variant: EmissionVariant) -> SourceTree {
    render_graph(spec, &CallGraph::build(spec), variant)
}

fn render_graph(spec: &GraphSpec, graph: &CallGraph, variant: EmissionVariant) -> SourceTree {
    let backend = variant.backend();
    let mut files = Vec::with_capacity(graph.len() + 3);

    files.push(SourceFile {
        name: backend.file_name("main"),
        kind: FileKind::Entry,
        contents: backend.render_entry(spec, graph.entry()),
    });

    for node in graph.nodes() {
        let contents = match &node.kind {
            NodeKind::Dispatch { successors } => backend.render_dispatch(node.id, successors),
            NodeKind::Terminal { threshold } => backend.render_terminal(node.id, *threshold),
        };
        files.push(SourceFile {
            name: backend.file_name(&node.id.symbol()),
            kind: FileKind::Node(node.id.0),
            contents,
        });
    }

    files.push(SourceFile {
        name: INTERFACE_FILE.to_string(),
        kind: FileKind::Interface,
        contents: render_interface(backend, graph),
    });

    let descriptor = render_build(backend, &files);
    files.push(SourceFile {
        name: BUILD_FILE.to_string(),
        kind: FileKind::BuildDescriptor,
        contents: descriptor,
    });

    SourceTree {
        variant,
        executable: backend.executable_name().to_string(),
        files,
    }
}

/// Shared header: the random stream plus one declaration per node.
fn render_interface(backend: &dyn Backend, graph: &CallGraph) -> String {
    let mut out = String::from("#pragma once\n\n");
    out.push_str(&rng::c_prelude());
    out.push('\n');
    for node in graph.nodes() {
        out.push_str(&backend.signature(node.id));
        out.push_str(";\n");
    }
    out
}

fn render_build(backend: &dyn Backend, files: &[SourceFile]) -> String {
    let mut out = format!(
        "project('{}', '{}', default_options : ['buildtype=debugoptimized'])\n\n\
         executable('{}',\n",
        PROJECT_NAME,
        backend.language(),
        backend.executable_name(),
    );
    for file in files.iter().filter(|f| f.kind.is_compile_unit()) {
        out.push_str(&format!("  '{}',\n", file.name));
    }
    out.push_str(")\n");
    out
}
