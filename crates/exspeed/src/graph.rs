//! Call graph topology shared by every rendering backend.

use crate::spec::GraphSpec;

/// Number of successors of every internal node.
pub const FAN_OUT: u32 = 5;

/// Index of a node in the call graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Symbol used for both the function and its file stem.
    pub fn symbol(&self) -> String {
        format!("node{}", self.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// What a node does when called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Draw a selector in `0..FAN_OUT` and call `successors[selector]`.
    Dispatch { successors: [NodeId; FAN_OUT as usize] },
    /// Draw a value in `0..100` and fail when it is below `threshold`.
    Terminal { threshold: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::Terminal { .. })
    }
}

/// The near-linear chain of `depth + 1` nodes described by a [`GraphSpec`].
///
/// Node `i < depth` dispatches to `min(i + k, depth)` for `k` in `1..=5`;
/// node `depth` is the only terminal. Every edge points strictly forward, so
/// any call from node 0 reaches the terminal within `depth + 1` calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallGraph {
    nodes: Vec<Node>,
}

impl CallGraph {
    pub fn build(spec: &GraphSpec) -> Self {
        let depth = spec.depth();
        let nodes = (0..=depth)
            .map(|index| {
                let kind = if index == depth {
                    NodeKind::Terminal {
                        threshold: spec.error_percent(),
                    }
                } else {
                    NodeKind::Dispatch {
                        successors: std::array::from_fn(|k| {
                            NodeId((index + 1 + k as u32).min(depth))
                        }),
                    }
                };
                Node {
                    id: NodeId(index),
                    kind,
                }
            })
            .collect();
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the terminal node always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn terminal(&self) -> NodeId {
        NodeId(self.nodes.len() as u32 - 1)
    }

    pub fn entry(&self) -> NodeId {
        NodeId(0)
    }

    /// Fewest hops from node 0 to the terminal, `ceil(depth / 5)`.
    pub fn max_hops_to_terminal(&self) -> u32 {
        self.terminal().0.div_ceil(FAN_OUT)
    }

    /// Check the forward-edge and clamping invariants.
    ///
    /// Returns the first offending node, if any.
    pub fn validate(&self) -> Result<(), NodeId> {
        let terminal = self.terminal();
        for node in &self.nodes {
            match node.kind {
                NodeKind::Dispatch { successors } => {
                    if node.id >= terminal {
                        return Err(node.id);
                    }
                    if successors.iter().any(|s| *s <= node.id || *s > terminal) {
                        return Err(node.id);
                    }
                }
                NodeKind::Terminal { .. } => {
                    if node.id != terminal {
                        return Err(node.id);
                    }
                }
            }
        }
        Ok(())
    }
}
