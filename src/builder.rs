use crate::edit::{AlleleEdit, EditKind};
use crate::error::GraphError;
use crate::graph::{NodeId, VariationGraph};
use crate::input::{ReferenceSource, VariantSource};
use crate::path_map::{PathMap, HEAD_POSITION};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Boundary nodes of recent edits keyed by the reference position where
/// they end. A later edit starting at that position is wired to them.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    by_end: BTreeMap<i64, BTreeSet<NodeId>>,
}

impl Frontier {
    pub fn new() -> Self {
        Frontier {
            by_end: BTreeMap::new(),
        }
    }

    pub fn record<I: IntoIterator<Item = NodeId>>(&mut self, end: i64, nodes: I) {
        self.by_end.entry(end).or_default().extend(nodes);
    }

    /// Nodes ending at `position`, in ascending id order.
    pub fn ending_at(&self, position: i64) -> Vec<NodeId> {
        self.by_end
            .get(&position)
            .map(|nodes| nodes.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drop every entry ending strictly before `position`.
    pub fn prune_below(&mut self, position: i64) {
        self.by_end = self.by_end.split_off(&position);
    }

    /// End positions still tracked, in ascending order.
    pub fn positions(&self) -> Vec<i64> {
        self.by_end.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.by_end.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_end.is_empty()
    }
}

/// Nodes around one applied edit.
///
/// `left` ends at the edit start and `right` begins at the edit end.
/// For a non-empty edit interval, `first` is the reference node starting
/// at the edit start and `middle` the one ending at the edit end. They are
/// the same node unless earlier edits already split the interval. `alt`
/// holds the alternate allele.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditNodes {
    pub left: NodeId,
    pub first: Option<NodeId>,
    pub middle: Option<NodeId>,
    pub alt: Option<NodeId>,
    pub right: NodeId,
}

/// Walk of one reference sequence through the finished graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferencePath {
    pub name: String,
    pub steps: Vec<NodeId>,
}

impl ReferencePath {
    /// Concatenated sequence of the steps that still exist in `graph`.
    pub fn sequence(&self, graph: &VariationGraph) -> Vec<u8> {
        let mut result = Vec::new();
        for &id in &self.steps {
            if let Some(node) = graph.node(id) {
                result.extend_from_slice(&node.sequence);
            }
        }
        result
    }
}

/// Folds a coordinate-sorted stream of allele edits for one reference
/// sequence into the graph.
pub struct GraphBuilder<'a> {
    graph: &'a mut VariationGraph,
    name: String,
    reference: &'a [u8],
    path: PathMap,
    frontier: Frontier,
    previous_start: Option<usize>,
}

impl<'a> GraphBuilder<'a> {
    /// Add a node for the whole reference sequence and start a path over it.
    pub fn new(graph: &'a mut VariationGraph, name: &str, reference: &'a [u8]) -> Self {
        let seed = graph.create_node(reference.to_vec());
        GraphBuilder {
            graph,
            name: name.to_string(),
            reference,
            path: PathMap::seeded(seed),
            frontier: Frontier::new(),
            previous_start: None,
        }
    }

    pub fn graph(&self) -> &VariationGraph {
        &*self.graph
    }

    pub fn path(&self) -> &PathMap {
        &self.path
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Apply one edit. Returns `None` when the edit matches the reference
    /// and therefore adds nothing.
    pub fn apply(&mut self, edit: &AlleleEdit) -> Result<Option<EditNodes>, GraphError> {
        self.check(edit)?;
        self.previous_start = Some(edit.start);

        let kind = match edit.kind() {
            Some(kind) if self.reference[edit.start..edit.end] != edit.alt[..] => kind,
            _ => {
                debug!("{}: skipping reference allele at {}..{}", self.name, edit.start, edit.end);
                return Ok(None);
            }
        };
        let start = edit.start as i64;
        let end = edit.end as i64;

        self.ensure_sentinels(edit);
        let mut nodes = self.split_at_start(start)?;
        if kind != EditKind::Insertion {
            self.split_at_end(&mut nodes, start, end)?;
        }
        self.attach_alt(&mut nodes, kind, &edit.alt);
        self.record_frontier(end, kind, &nodes);
        self.stitch_frontier(start, &nodes);
        self.frontier.prune_below(start);

        debug!(
            "{}: {:?} at {}..{} -> left {} first {:?} middle {:?} alt {:?} right {}",
            self.name, kind, edit.start, edit.end, nodes.left, nodes.first, nodes.middle, nodes.alt, nodes.right
        );
        Ok(Some(nodes))
    }

    /// Finish the sequence and return its reference path.
    pub fn finish(self) -> ReferencePath {
        ReferencePath {
            name: self.name,
            steps: self.path.nodes(),
        }
    }

    fn check(&self, edit: &AlleleEdit) -> Result<(), GraphError> {
        if edit.start > edit.end {
            return Err(GraphError::MalformedEdit {
                start: edit.start,
                end: edit.end,
            });
        }
        if edit.end > self.reference.len() {
            return Err(GraphError::EditOutOfRange {
                sequence: self.name.clone(),
                start: edit.start,
                end: edit.end,
                length: self.reference.len(),
            });
        }
        match self.previous_start {
            Some(previous) if edit.start < previous => Err(GraphError::UnsortedEdit {
                sequence: self.name.clone(),
                start: edit.start,
                previous,
            }),
            _ => Ok(()),
        }
    }

    /// Empty nodes before the first and after the last base give edits at
    /// either boundary a node to attach to. Each is created once.
    fn ensure_sentinels(&mut self, edit: &AlleleEdit) {
        if edit.start == 0 && !self.path.contains(HEAD_POSITION) {
            if let Some((_, first)) = self.path.floor(0) {
                let head = self.graph.create_node(Vec::new());
                self.graph.create_edge(head, first);
                self.path.insert(HEAD_POSITION, head);
            }
        }
        let length = self.reference.len() as i64;
        if edit.end == self.reference.len() && !self.path.contains(length) {
            if let Some((_, last)) = self.path.predecessor(length) {
                let tail = self.graph.create_node(Vec::new());
                self.graph.create_edge(last, tail);
                self.path.insert(length, tail);
            }
        }
    }

    fn split_at_start(&mut self, start: i64) -> Result<EditNodes, GraphError> {
        let (left, right) = self.graph.divide_path(&mut self.path, start)?;
        Ok(EditNodes {
            left,
            first: None,
            middle: None,
            alt: None,
            right,
        })
    }

    fn split_at_end(&mut self, nodes: &mut EditNodes, start: i64, end: i64) -> Result<(), GraphError> {
        let (middle, right) = self.graph.divide_path(&mut self.path, end)?;
        // Looked up after the end split, which may have divided it
        nodes.first = self.path.get(start);
        nodes.middle = Some(middle);
        nodes.right = right;
        Ok(())
    }

    fn attach_alt(&mut self, nodes: &mut EditNodes, kind: EditKind, alt: &[u8]) {
        match kind {
            EditKind::Substitution | EditKind::Insertion => {
                let alt = self.graph.create_node(alt.to_vec());
                self.graph.create_edge(nodes.left, alt);
                self.graph.create_edge(alt, nodes.right);
                if let Some(first) = nodes.first {
                    self.graph.create_edge(nodes.left, first);
                }
                nodes.alt = Some(alt);
            }
            EditKind::Deletion => {
                self.graph.create_edge(nodes.left, nodes.right);
            }
        }
    }

    fn record_frontier(&mut self, end: i64, kind: EditKind, nodes: &EditNodes) {
        match kind {
            EditKind::Substitution => self.frontier.record(end, nodes.alt.into_iter().chain(nodes.middle)),
            EditKind::Insertion => self.frontier.record(end, nodes.alt.into_iter().chain([nodes.left])),
            EditKind::Deletion => self.frontier.record(end, [nodes.left]),
        }
    }

    /// Connect nodes of earlier edits ending at `start` to the reference
    /// node starting there and to this edit's alternate node. Nodes divided
    /// since they were recorded no longer exist and are skipped.
    fn stitch_frontier(&mut self, start: i64, nodes: &EditNodes) {
        for previous in self.frontier.ending_at(start) {
            if !self.graph.has_node(previous) {
                continue;
            }
            if let Some(first) = nodes.first {
                self.graph.create_edge(previous, first);
            }
            if let Some(alt) = nodes.alt {
                self.graph.create_edge(previous, alt);
            }
        }
    }
}

impl VariationGraph {
    /// Build a graph from every sequence of `reference` and the edits
    /// `variants` lists for it. Returns the graph and one reference path
    /// per sequence.
    pub fn construct<R, V>(reference: &R, variants: &V) -> Result<(Self, Vec<ReferencePath>), GraphError>
    where
        R: ReferenceSource + ?Sized,
        V: VariantSource + ?Sized,
    {
        let mut graph = VariationGraph::new();
        let mut paths = Vec::new();
        for name in reference.sequence_names() {
            let sequence = reference
                .sequence(&name)
                .ok_or_else(|| GraphError::MissingSequence(name.clone()))?;
            let edits = variants.edits(&name);
            info!("Building {} ({} bp, {} edits)", name, sequence.len(), edits.len());

            let mut builder = GraphBuilder::new(&mut graph, &name, sequence);
            for edit in edits {
                builder.apply(edit)?;
            }
            paths.push(builder.finish());
        }
        info!(
            "Built graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok((graph, paths))
    }
}
