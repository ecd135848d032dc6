//! Hand-off of a finished graph to an external sequence-to-graph aligner.
use crate::error::GraphError;
use crate::graph::{NodeId, VariationGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use tracing::debug;

/// Scoring parameters passed through to the aligner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentScores {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Default for AlignmentScores {
    fn default() -> Self {
        AlignmentScores {
            match_score: 2,
            mismatch_penalty: 2,
            gap_open: 3,
            gap_extend: 1,
        }
    }
}

impl AlignmentScores {
    /// Parse `match,mismatch,gap_open,gap_extend`.
    pub fn parse(scores_str: &str) -> Result<Self, String> {
        let parts: Vec<&str> = scores_str.split(',').map(|p| p.trim()).collect();

        if parts.len() != 4 {
            return Err("Scores must have exactly 4 values: match,mismatch,gap_open,gap_extend".to_string());
        }

        let match_score = parts[0]
            .parse::<i32>()
            .map_err(|_| format!("Invalid match score: {}", parts[0]))?;
        let mismatch_penalty = parts[1]
            .parse::<i32>()
            .map_err(|_| format!("Invalid mismatch penalty: {}", parts[1]))?;
        let gap_open = parts[2]
            .parse::<i32>()
            .map_err(|_| format!("Invalid gap_open penalty: {}", parts[2]))?;
        let gap_extend = parts[3]
            .parse::<i32>()
            .map_err(|_| format!("Invalid gap_extend penalty: {}", parts[3]))?;

        Ok(AlignmentScores {
            match_score,
            mismatch_penalty,
            gap_open,
            gap_extend,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignableNode {
    pub id: NodeId,
    pub sequence: String,
}

/// Read-only adjacency view of a graph: every node and every edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignableGraph {
    /// Nodes in topological order where the graph allows one
    pub nodes: Vec<AlignableNode>,
    pub edges: Vec<(NodeId, NodeId)>,
}

impl AlignableGraph {
    pub fn from_graph(graph: &VariationGraph) -> Self {
        let nodes = topological_order(graph)
            .into_iter()
            .filter_map(|id| graph.node(id))
            .map(|node| AlignableNode {
                id: node.id,
                sequence: node.sequence_string(),
            })
            .collect();
        let edges = graph.edges().iter().map(|edge| (edge.from, edge.to)).collect();
        AlignableGraph { nodes, edges }
    }
}

/// What an external aligner process receives: the graph view and the
/// scores to align with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRequest {
    pub scores: AlignmentScores,
    pub graph: AlignableGraph,
}

impl AlignmentRequest {
    pub fn new(graph: &VariationGraph, scores: AlignmentScores) -> Self {
        AlignmentRequest {
            scores,
            graph: AlignableGraph::from_graph(graph),
        }
    }
}

/// Kahn's algorithm with ties broken by smallest id. Nodes left over on
/// cycles are appended in id order.
pub fn topological_order(graph: &VariationGraph) -> Vec<NodeId> {
    let mut in_degree: HashMap<NodeId, usize> = graph
        .nodes()
        .iter()
        .map(|node| (node.id, graph.in_degree(node.id)))
        .collect();
    let mut ready: BTreeSet<NodeId> = in_degree
        .iter()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(id) = ready.pop_first() {
        order.push(id);
        in_degree.remove(&id);
        for next in graph.successors(id) {
            if let Some(degree) = in_degree.get_mut(&next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(next);
                }
            }
        }
    }

    if !in_degree.is_empty() {
        let mut remaining: Vec<NodeId> = in_degree.into_keys().collect();
        remaining.sort_unstable();
        debug!("{} nodes lie on cycles and keep id order", remaining.len());
        order.extend(remaining);
    }
    order
}

/// Where part of the query landed on one node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub node_id: NodeId,
    pub offset: usize,
    pub cigar: String,
}

/// Result of aligning one query. An empty mapping list is a valid result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traceback {
    pub score: i32,
    pub mappings: Vec<Mapping>,
}

/// Trait for alignment backends. Implementations only read the graph.
pub trait Aligner {
    fn align(
        &self,
        graph: &AlignableGraph,
        query: &[u8],
        scores: &AlignmentScores,
    ) -> Result<Traceback, Box<dyn Error + Send + Sync>>;
}

impl VariationGraph {
    /// Align `query` to the graph with an external aligner. Blocks until
    /// the aligner returns.
    pub fn align(
        &self,
        aligner: &dyn Aligner,
        query: &[u8],
        scores: &AlignmentScores,
    ) -> Result<Traceback, GraphError> {
        let view = AlignableGraph::from_graph(self);
        aligner.align(&view, query, scores).map_err(GraphError::Aligner)
    }
}
