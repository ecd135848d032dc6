use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{trace, warn};

/// Node identifiers are handed out by the graph and never reused while it lives.
pub type NodeId = u64;

/// A node in the variation graph holding a fragment of sequence.
/// Sentinel nodes at the boundaries of a reference carry an empty sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub sequence: Vec<u8>,
}

impl Node {
    pub fn new(id: NodeId, sequence: Vec<u8>) -> Self {
        Node { id, sequence }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn sequence_string(&self) -> String {
        String::from_utf8_lossy(&self.sequence).to_string()
    }
}

/// A directed adjacency between two nodes. At most one edge exists per
/// ordered pair, so the pair itself is the edge's identity.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Edge { from, to }
    }
}

/// Node and edge store with dense backing vectors and the indices needed
/// to find, rewire and remove elements in constant amortized time.
///
/// `node_index` and `edge_index` map an element to its slot in `nodes` or
/// `edges`; removal swaps the element with the last one and fixes the
/// moved element's slot. `edges_from_to` and `edges_to_from` hold the same
/// set of pairs seen from either end.
#[derive(Clone, Debug)]
pub struct VariationGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    pub(crate) node_index: HashMap<NodeId, usize>,
    pub(crate) edge_index: HashMap<Edge, usize>,
    pub(crate) edges_from_to: HashMap<NodeId, BTreeSet<NodeId>>,
    pub(crate) edges_to_from: HashMap<NodeId, BTreeSet<NodeId>>,
    next_id: NodeId,
}

impl Default for VariationGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl VariationGraph {
    pub fn new() -> Self {
        VariationGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
            edges_from_to: HashMap::new(),
            edges_to_from: HashMap::new(),
            next_id: 1,
        }
    }

    /// Build a graph from existing node records, keeping their ids.
    /// The id counter continues after the largest id seen.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, GraphError> {
        Self::from_parts(nodes, Vec::new())
    }

    /// Build a graph from node and edge records, e.g. when loading a
    /// serialized graph. Record order does not need to match creation order.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut graph = VariationGraph::new();
        for node in nodes {
            if graph.node_index.contains_key(&node.id) {
                return Err(GraphError::DuplicateNodeId(node.id));
            }
            let after = node.id.checked_add(1).ok_or(GraphError::IdOverflow(node.id))?;
            graph.next_id = graph.next_id.max(after);
            graph.node_index.insert(node.id, graph.nodes.len());
            graph.nodes.push(node);
        }
        for edge in edges {
            if !graph.has_node(edge.from) || !graph.has_node(edge.to) {
                return Err(GraphError::DanglingEdge {
                    from: edge.from,
                    to: edge.to,
                });
            }
            if graph.create_edge(edge.from, edge.to).is_none() {
                warn!("Skipping self-loop record on node {}", edge.from);
            }
        }
        Ok(graph)
    }

    /// Allocate a new node with the next id.
    pub fn create_node(&mut self, sequence: Vec<u8>) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.node_index.insert(id, self.nodes.len());
        self.nodes.push(Node::new(id, sequence));
        id
    }

    /// Connect `from` to `to`. Self-loops are rejected and return `None`;
    /// an existing edge is returned unchanged.
    pub fn create_edge(&mut self, from: NodeId, to: NodeId) -> Option<Edge> {
        if from == to {
            return None;
        }
        let edge = Edge::new(from, to);
        if self.has_edge(from, to) {
            return Some(edge);
        }
        self.edges_from_to.entry(from).or_default().insert(to);
        self.edges_to_from.entry(to).or_default().insert(from);
        self.edge_index.insert(edge, self.edges.len());
        self.edges.push(edge);
        trace!("Created edge {} -> {}", from, to);
        Some(edge)
    }

    /// Remove an edge from both adjacency maps and from storage.
    pub fn destroy_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        let slot = self.edge_index.remove(&edge).ok_or(GraphError::EdgeNotFound {
            from: edge.from,
            to: edge.to,
        })?;
        unlink(&mut self.edges_from_to, edge.from, edge.to);
        unlink(&mut self.edges_to_from, edge.to, edge.from);

        self.edges.swap_remove(slot);
        // The former last edge now lives in the freed slot
        if let Some(moved) = self.edges.get(slot) {
            self.edge_index.insert(*moved, slot);
        }
        trace!("Destroyed edge {} -> {}", edge.from, edge.to);
        Ok(())
    }

    /// Remove a node together with every edge touching it.
    /// Returns the removed node.
    pub fn destroy_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        let slot = *self.node_index.get(&id).ok_or(GraphError::NodeNotFound(id))?;

        let mut edges_to_destroy = BTreeSet::new();
        if let Some(targets) = self.edges_from_to.get(&id) {
            edges_to_destroy.extend(targets.iter().map(|&to| Edge::new(id, to)));
        }
        if let Some(sources) = self.edges_to_from.get(&id) {
            edges_to_destroy.extend(sources.iter().map(|&from| Edge::new(from, id)));
        }
        for edge in edges_to_destroy {
            self.destroy_edge(edge)?;
        }
        self.edges_from_to.remove(&id);
        self.edges_to_from.remove(&id);

        self.node_index.remove(&id);
        let node = self.nodes.swap_remove(slot);
        if let Some(moved) = self.nodes.get(slot) {
            self.node_index.insert(moved.id, slot);
        }
        trace!("Destroyed node {}", id);
        Ok(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edge_index.contains_key(&Edge::new(from, to))
    }

    /// Nodes in storage order. The order changes when nodes are destroyed.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in storage order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The id the next created node will receive.
    pub fn next_id(&self) -> NodeId {
        self.next_id
    }

    /// Targets of the edges leaving `id`, in ascending id order.
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.edges_from_to
            .get(&id)
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Sources of the edges entering `id`, in ascending id order.
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.edges_to_from
            .get(&id)
            .map(|sources| sources.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.edges_from_to.get(&id).map_or(0, |targets| targets.len())
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.edges_to_from.get(&id).map_or(0, |sources| sources.len())
    }

    /// Nodes without incoming edges, sorted by id.
    pub fn head_nodes(&self) -> Vec<NodeId> {
        let mut heads: Vec<NodeId> = self
            .nodes
            .iter()
            .map(|node| node.id)
            .filter(|&id| self.in_degree(id) == 0)
            .collect();
        heads.sort_unstable();
        heads
    }

    /// Nodes without outgoing edges, sorted by id.
    pub fn tail_nodes(&self) -> Vec<NodeId> {
        let mut tails: Vec<NodeId> = self
            .nodes
            .iter()
            .map(|node| node.id)
            .filter(|&id| self.out_degree(id) == 0)
            .collect();
        tails.sort_unstable();
        tails
    }

    /// Total sequence length over all nodes.
    pub fn total_length(&self) -> usize {
        self.nodes.iter().map(|node| node.len()).sum()
    }
}

fn unlink(adjacency: &mut HashMap<NodeId, BTreeSet<NodeId>>, key: NodeId, value: NodeId) {
    if let Some(set) = adjacency.get_mut(&key) {
        set.remove(&value);
        if set.is_empty() {
            adjacency.remove(&key);
        }
    }
}
