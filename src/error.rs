use crate::graph::NodeId;
use crate::validate::InvalidGraph;
use std::io;
use thiserror::Error;

/// Everything that can go wrong while building, mutating, loading or
/// handing off a variation graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("edge {from} -> {to} does not exist")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("cannot divide node {node} of length {length} at offset {offset}")]
    InvalidOffset {
        node: NodeId,
        offset: usize,
        length: usize,
    },

    #[error("invalid path coordinate {position}: {reason}")]
    InvalidCoordinate { position: i64, reason: &'static str },

    #[error("edit at {start} on {sequence} comes after an edit at {previous}; edits must be sorted by start")]
    UnsortedEdit {
        sequence: String,
        start: usize,
        previous: usize,
    },

    #[error("edit {start}..{end} exceeds the length {length} of {sequence}")]
    EditOutOfRange {
        sequence: String,
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("malformed edit {start}..{end}: start is past end")]
    MalformedEdit { start: usize, end: usize },

    #[error("duplicate node id {0}")]
    DuplicateNodeId(NodeId),

    #[error("node id {0} leaves no room for new ids")]
    IdOverflow(NodeId),

    #[error("edge {from} -> {to} refers to a missing node")]
    DanglingEdge { from: NodeId, to: NodeId },

    #[error("reference sequence {0} not found")]
    MissingSequence(String),

    #[error("either a reference or a serialized graph is required")]
    NoInput,

    #[error("invalid alignment scores: {0}")]
    InvalidScores(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("record stream ends in the middle of a record")]
    Truncated,

    #[error("aligner failed: {0}")]
    Aligner(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Invalid(#[from] InvalidGraph),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("record encoding: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("json encoding: {0}")]
    Json(#[from] serde_json::Error),
}
