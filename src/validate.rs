use crate::graph::{Edge, NodeId, VariationGraph};
use thiserror::Error;
use tracing::warn;

/// First structural problem found in a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidGraph {
    #[error("graph invalid: edge index={slot} cannot find node (from) {node}")]
    MissingFromNode { slot: usize, node: NodeId },

    #[error("graph invalid: edge index={slot} cannot find node (to) {node}")]
    MissingToNode { slot: usize, node: NodeId },

    #[error("graph invalid: edge index={slot} has no entry in edges_from_to for {from} -> {to}")]
    MissingFromToEntry { slot: usize, from: NodeId, to: NodeId },

    #[error("graph invalid: edge index={slot} has no entry in edges_to_from for {from} -> {to}")]
    MissingToFromEntry { slot: usize, from: NodeId, to: NodeId },

    #[error("graph invalid: node {node} is indexed at slot {indexed:?} but stored at slot {actual}")]
    NodeSlotMismatch {
        node: NodeId,
        indexed: Option<usize>,
        actual: usize,
    },

    #[error("graph invalid: edge {from} -> {to} is indexed at slot {indexed:?} but stored at slot {actual}")]
    EdgeSlotMismatch {
        from: NodeId,
        to: NodeId,
        indexed: Option<usize>,
        actual: usize,
    },

    #[error("graph invalid: {index} has {indexed} entries for {stored} stored elements")]
    IndexSize {
        index: &'static str,
        indexed: usize,
        stored: usize,
    },

    #[error("graph invalid: adjacency maps disagree on {from} -> {to}")]
    AdjacencyMismatch { from: NodeId, to: NodeId },

    #[error("graph invalid: self-loop on node {0}")]
    SelfLoop(NodeId),
}

impl VariationGraph {
    /// Check that every edge connects existing nodes and is present in both
    /// adjacency maps. Reports the first problem through the log.
    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(problem) => {
                warn!("{}", problem);
                false
            }
        }
    }

    /// Same checks as [`VariationGraph::is_valid`], returning the problem.
    pub fn validate(&self) -> Result<(), InvalidGraph> {
        for (slot, edge) in self.edges().iter().enumerate() {
            let Edge { from, to } = *edge;
            if !self.has_node(from) {
                return Err(InvalidGraph::MissingFromNode { slot, node: from });
            }
            if !self.has_node(to) {
                return Err(InvalidGraph::MissingToNode { slot, node: to });
            }
            if !self.edges_from_to.get(&from).map_or(false, |targets| targets.contains(&to)) {
                return Err(InvalidGraph::MissingFromToEntry { slot, from, to });
            }
            if !self.edges_to_from.get(&to).map_or(false, |sources| sources.contains(&from)) {
                return Err(InvalidGraph::MissingToFromEntry { slot, from, to });
            }
        }
        Ok(())
    }

    /// Exhaustive consistency check of all indices: slot positions, index
    /// sizes, mirrored adjacency and the absence of self-loops.
    pub fn check_indices(&self) -> Result<(), InvalidGraph> {
        self.validate()?;

        if self.node_index.len() != self.node_count() {
            return Err(InvalidGraph::IndexSize {
                index: "node_index",
                indexed: self.node_index.len(),
                stored: self.node_count(),
            });
        }
        for (actual, node) in self.nodes().iter().enumerate() {
            let indexed = self.node_index.get(&node.id).copied();
            if indexed != Some(actual) {
                return Err(InvalidGraph::NodeSlotMismatch {
                    node: node.id,
                    indexed,
                    actual,
                });
            }
        }

        if self.edge_index.len() != self.edge_count() {
            return Err(InvalidGraph::IndexSize {
                index: "edge_index",
                indexed: self.edge_index.len(),
                stored: self.edge_count(),
            });
        }
        for (actual, edge) in self.edges().iter().enumerate() {
            if edge.from == edge.to {
                return Err(InvalidGraph::SelfLoop(edge.from));
            }
            let indexed = self.edge_index.get(edge).copied();
            if indexed != Some(actual) {
                return Err(InvalidGraph::EdgeSlotMismatch {
                    from: edge.from,
                    to: edge.to,
                    indexed,
                    actual,
                });
            }
        }

        // Every adjacency entry must be backed by a stored edge
        let forward: usize = self.edges_from_to.values().map(|targets| targets.len()).sum();
        let backward: usize = self.edges_to_from.values().map(|sources| sources.len()).sum();
        for (index, size) in [("edges_from_to", forward), ("edges_to_from", backward)] {
            if size != self.edge_count() {
                return Err(InvalidGraph::IndexSize {
                    index,
                    indexed: size,
                    stored: self.edge_count(),
                });
            }
        }
        for (&from, targets) in &self.edges_from_to {
            for &to in targets {
                if !self.edge_index.contains_key(&Edge::new(from, to)) {
                    return Err(InvalidGraph::AdjacencyMismatch { from, to });
                }
            }
        }
        Ok(())
    }
}
