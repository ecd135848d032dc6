mod common;

use common::{assert_connected, build, edge_set, seq, spelled_sequences};
use std::collections::BTreeSet;
use vgrush::path_map::HEAD_POSITION;
use vgrush::{AlleleEdit, EditTable, FastaReference, FastaSequence, GraphBuilder, GraphError, VariationGraph};

fn spelled(items: &[&[u8]]) -> BTreeSet<Vec<u8>> {
    items.iter().map(|s| s.to_vec()).collect()
}

#[test]
fn test_no_variation() {
    let (graph, _, path) = build(b"ACGT", &[]);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(seq(&graph, path.steps[0]), b"ACGT");
    assert!(graph.is_valid());
}

#[test]
fn test_single_substitution() {
    let (graph, applied, path) = build(b"AAAA", &[AlleleEdit::substitution(1, 2, b"T")]);
    let nodes = applied[0].unwrap();
    let (prefix, middle, alt, suffix) = (nodes.left, nodes.middle.unwrap(), nodes.alt.unwrap(), nodes.right);

    assert_eq!(seq(&graph, prefix), b"A");
    assert_eq!(seq(&graph, middle), b"A");
    assert_eq!(seq(&graph, alt), b"T");
    assert_eq!(seq(&graph, suffix), b"AA");
    assert_eq!(graph.node_count(), 4);
    assert_eq!(
        edge_set(&graph),
        [(prefix, middle), (prefix, alt), (alt, suffix), (middle, suffix)]
            .into_iter()
            .collect()
    );
    assert!(graph.is_valid());
    assert_eq!(path.steps, vec![prefix, middle, suffix]);
    assert_eq!(spelled_sequences(&graph), spelled(&[b"AAAA", b"ATAA"]));
}

#[test]
fn test_pure_insertion_keeps_reference_bypass() {
    let (graph, applied, _) = build(b"AAAA", &[AlleleEdit::insertion(2, b"GG")]);
    let nodes = applied[0].unwrap();
    let alt = nodes.alt.unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(seq(&graph, nodes.left), b"AA");
    assert_eq!(seq(&graph, alt), b"GG");
    assert_eq!(seq(&graph, nodes.right), b"AA");
    assert!(graph.has_edge(nodes.left, alt));
    assert!(graph.has_edge(alt, nodes.right));
    assert!(graph.has_edge(nodes.left, nodes.right));
    assert_eq!(graph.edge_count(), 3);
    assert!(graph.is_valid());
    assert_eq!(spelled_sequences(&graph), spelled(&[b"AAAA", b"AAGGAA"]));
}

#[test]
fn test_pure_deletion() {
    let (graph, applied, path) = build(b"AAAA", &[AlleleEdit::deletion(1, 3)]);
    let nodes = applied[0].unwrap();
    let middle = nodes.middle.unwrap();

    assert!(nodes.alt.is_none());
    assert_eq!(seq(&graph, nodes.left), b"A");
    assert_eq!(seq(&graph, nodes.right), b"A");
    assert!(graph.has_edge(nodes.left, nodes.right));
    // The deleted interval stays on the reference path only
    assert_eq!(seq(&graph, middle), b"AA");
    assert_eq!(path.steps, vec![nodes.left, middle, nodes.right]);
    assert_eq!(graph.successors(nodes.left), vec![middle, nodes.right]);
    assert!(graph.is_valid());
    assert_eq!(spelled_sequences(&graph), spelled(&[b"AAAA", b"AA"]));
}

#[test]
fn test_adjacent_variants_are_stitched() {
    let (graph, applied, path) = build(
        b"AAAA",
        &[AlleleEdit::substitution(1, 2, b"T"), AlleleEdit::substitution(2, 3, b"C")],
    );
    let first = applied[0].unwrap();
    let second = applied[1].unwrap();
    let t = first.alt.unwrap();
    let c = second.alt.unwrap();

    // The first edit's reference middle is the second edit's left anchor
    assert_eq!(second.left, first.middle.unwrap());
    assert!(graph.has_edge(t, c));
    assert!(graph.has_edge(t, second.middle.unwrap()));
    assert!(graph.has_edge(first.middle.unwrap(), c));

    assert_connected(&graph, &[path.steps[0]], &[*path.steps.last().unwrap()]);
    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.edge_count(), 8);
    assert!(graph.check_indices().is_ok());
    assert_eq!(
        spelled_sequences(&graph),
        spelled(&[b"AAAA", b"AACA", b"ATAA", b"ATCA"])
    );
}

#[test]
fn test_variation_at_both_boundaries() {
    let (graph, applied, path) = build(
        b"ACGT",
        &[AlleleEdit::substitution(0, 1, b"T"), AlleleEdit::substitution(3, 4, b"A")],
    );
    let head = path.steps[0];
    let tail = *path.steps.last().unwrap();

    assert_eq!(applied[0].unwrap().left, head);
    assert_eq!(applied[1].unwrap().right, tail);
    assert!(graph.node(head).unwrap().is_empty());
    assert!(graph.node(tail).unwrap().is_empty());
    assert_connected(&graph, &[head], &[tail]);
    assert_eq!(path.sequence(&graph), b"ACGT");
    assert_eq!(
        spelled_sequences(&graph),
        spelled(&[b"ACGT", b"ACGA", b"TCGT", b"TCGA"])
    );
}

#[test]
fn test_insertions_at_sequence_ends() {
    let (graph, _, path) = build(b"CC", &[AlleleEdit::insertion(0, b"G"), AlleleEdit::insertion(2, b"T")]);
    assert_eq!(path.sequence(&graph), b"CC");
    assert_eq!(
        spelled_sequences(&graph),
        spelled(&[b"CC", b"GCC", b"CCT", b"GCCT"])
    );
    assert!(graph.check_indices().is_ok());
}

#[test]
fn test_variant_inside_deletion() {
    let (graph, _, path) = build(
        b"ACGTACGT",
        &[AlleleEdit::deletion(1, 5), AlleleEdit::substitution(3, 4, b"A")],
    );
    assert_eq!(path.sequence(&graph), b"ACGTACGT");
    assert_eq!(
        spelled_sequences(&graph),
        spelled(&[b"ACGTACGT", b"ACGAACGT", b"ACGT"])
    );
    assert!(graph.check_indices().is_ok());
}

#[test]
fn test_repeated_breakpoints_do_not_duplicate_nodes() {
    let (graph, applied, _) = build(
        b"ACGTACGT",
        &[
            AlleleEdit::substitution(2, 4, b"TT"),
            AlleleEdit::substitution(2, 4, b"AA"),
            AlleleEdit::deletion(2, 4),
        ],
    );
    let first = applied[0].unwrap();
    for nodes in applied.iter().skip(1) {
        let nodes = nodes.unwrap();
        assert_eq!(nodes.left, first.left);
        assert_eq!(nodes.middle, first.middle);
        assert_eq!(nodes.right, first.right);
    }
    // Three reference pieces plus two alternate alleles
    assert_eq!(graph.node_count(), 5);
    assert_eq!(
        spelled_sequences(&graph),
        spelled(&[b"ACGTACGT", b"ACTTACGT", b"ACAAACGT", b"ACACGT"])
    );
}

#[test]
fn test_unsorted_input_fails_loudly() {
    let mut graph = VariationGraph::new();
    let mut builder = GraphBuilder::new(&mut graph, "chr", b"ACGTACGT");
    builder.apply(&AlleleEdit::substitution(4, 5, b"T")).unwrap();
    let result = builder.apply(&AlleleEdit::substitution(1, 2, b"T"));
    assert!(matches!(result, Err(GraphError::UnsortedEdit { .. })));
    assert!(graph.check_indices().is_ok());
}

#[test]
fn test_construct_multiple_sequences() {
    let reference = FastaReference::new(vec![
        FastaSequence { id: "chr1".to_string(), data: b"AAAA".to_vec() },
        FastaSequence { id: "chr2".to_string(), data: b"CCCC".to_vec() },
    ]);
    let edits = EditTable::parse("chr1\t1\t2\tT\n").unwrap();

    let (graph, paths) = VariationGraph::construct(&reference, &edits).unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0].name, "chr1");
    assert_eq!(paths[0].sequence(&graph), b"AAAA");
    assert_eq!(paths[1].sequence(&graph), b"CCCC");
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.head_nodes(), vec![paths[0].steps[0], paths[1].steps[0]]);
    assert!(graph.is_valid());
}

#[test]
fn test_construct_reports_out_of_range_edit() {
    let reference = FastaReference::new(vec![FastaSequence {
        id: "chr1".to_string(),
        data: b"AC".to_vec(),
    }]);
    let edits = EditTable::parse("chr1\t1\t3\tT\n").unwrap();
    assert!(matches!(
        VariationGraph::construct(&reference, &edits),
        Err(GraphError::EditOutOfRange { end: 3, length: 2, .. })
    ));
}

#[test]
fn test_head_sentinel_position() {
    let mut graph = VariationGraph::new();
    let mut builder = GraphBuilder::new(&mut graph, "chr", b"AC");
    builder.apply(&AlleleEdit::deletion(0, 1)).unwrap();
    let head = builder.path().get(HEAD_POSITION).unwrap();
    assert_eq!(builder.path().first(), Some((HEAD_POSITION, head)));
    let path = builder.finish();
    assert_eq!(spelled_sequences(&graph), spelled(&[b"AC", b"C"]));
    assert_eq!(path.sequence(&graph), b"AC");
}

#[test]
fn test_longer_edit_over_split_interval_keeps_skipped_bases() {
    let (graph, applied, _) = build(
        b"ACGTAC",
        &[AlleleEdit::substitution(1, 2, b"T"), AlleleEdit::substitution(1, 3, b"GG")],
    );
    let second = applied[1].unwrap();
    // The reference interval 1..3 now spans two nodes
    assert_ne!(second.first, second.middle);
    assert_eq!(seq(&graph, second.first.unwrap()), b"C");
    assert_eq!(seq(&graph, second.middle.unwrap()), b"G");
    assert!(!graph.has_edge(second.left, second.middle.unwrap()));
    assert_eq!(
        spelled_sequences(&graph),
        spelled(&[b"ACGTAC", b"ATGTAC", b"AGGTAC"])
    );
}

#[test]
fn test_edit_starting_inside_earlier_edit() {
    let (graph, applied, path) = build(
        b"ACGTAC",
        &[AlleleEdit::substitution(1, 3, b"T"), AlleleEdit::substitution(2, 4, b"G")],
    );
    let second = applied[1].unwrap();
    assert_eq!(seq(&graph, second.first.unwrap()), b"G");
    assert_eq!(seq(&graph, second.middle.unwrap()), b"T");
    assert_eq!(path.sequence(&graph), b"ACGTAC");
    assert_eq!(
        spelled_sequences(&graph),
        spelled(&[b"ACGTAC", b"ATTAC", b"ACGAC"])
    );
}
