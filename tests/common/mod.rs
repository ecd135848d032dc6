#![allow(dead_code)]

use std::collections::BTreeSet;
use vgrush::{AlleleEdit, EditNodes, GraphBuilder, NodeId, ReferencePath, VariationGraph};

/// Build one reference sequence with the given edits and return the graph,
/// the per-edit nodes and the reference path.
pub fn build(reference: &[u8], edits: &[AlleleEdit]) -> (VariationGraph, Vec<Option<EditNodes>>, ReferencePath) {
    let mut graph = VariationGraph::new();
    let mut builder = GraphBuilder::new(&mut graph, "chr", reference);
    let applied = edits
        .iter()
        .map(|edit| builder.apply(edit).unwrap())
        .collect();
    let path = builder.finish();
    (graph, applied, path)
}

pub fn seq(graph: &VariationGraph, id: NodeId) -> Vec<u8> {
    graph.node(id).unwrap().sequence.clone()
}

pub fn edge_set(graph: &VariationGraph) -> BTreeSet<(NodeId, NodeId)> {
    graph.edges().iter().map(|e| (e.from, e.to)).collect()
}

/// Every node except the heads has a predecessor and every node except the
/// tails has a successor.
pub fn assert_connected(graph: &VariationGraph, heads: &[NodeId], tails: &[NodeId]) {
    assert_eq!(graph.head_nodes(), heads, "unexpected nodes without predecessors");
    assert_eq!(graph.tail_nodes(), tails, "unexpected nodes without successors");
}

/// All sequences spelled by walks from heads to tails, for small DAGs.
pub fn spelled_sequences(graph: &VariationGraph) -> BTreeSet<Vec<u8>> {
    let mut result = BTreeSet::new();
    let mut stack: Vec<(NodeId, Vec<u8>)> = graph
        .head_nodes()
        .into_iter()
        .map(|id| (id, seq(graph, id)))
        .collect();
    while let Some((id, prefix)) = stack.pop() {
        let successors = graph.successors(id);
        if successors.is_empty() {
            result.insert(prefix);
            continue;
        }
        for next in successors {
            let mut extended = prefix.clone();
            extended.extend(seq(graph, next));
            stack.push((next, extended));
        }
    }
    result
}

/// Every sequence obtained by applying a subset of `edits` in which each
/// chosen edit starts at or after the end of the one chosen before it.
/// Walks of a correctly built graph spell only these sequences.
pub fn allele_combinations(reference: &[u8], edits: &[AlleleEdit]) -> BTreeSet<Vec<u8>> {
    let mut result = BTreeSet::new();
    for mask in 0u32..(1 << edits.len()) {
        let chosen: Vec<&AlleleEdit> = edits
            .iter()
            .enumerate()
            .filter(|&(i, _)| mask & (1 << i) != 0)
            .map(|(_, edit)| edit)
            .collect();
        if chosen.windows(2).any(|pair| pair[1].start < pair[0].end) {
            continue;
        }
        let mut sequence = Vec::new();
        let mut position = 0;
        for edit in chosen {
            sequence.extend_from_slice(&reference[position..edit.start]);
            sequence.extend_from_slice(&edit.alt);
            position = edit.end;
        }
        sequence.extend_from_slice(&reference[position..]);
        result.insert(sequence);
    }
    result
}

/// The reference with only `edit` applied.
pub fn apply_one(reference: &[u8], edit: &AlleleEdit) -> Vec<u8> {
    let mut sequence = reference[..edit.start].to_vec();
    sequence.extend_from_slice(&edit.alt);
    sequence.extend_from_slice(&reference[edit.end..]);
    sequence
}
