//! Length-prefixed binary record stream for persisting a graph.
//!
//! Every record is a little-endian `u32` byte count followed by that many
//! bytes of a `bincode`-encoded [`Record`]. Nodes are written before edges,
//! each in storage order, but readers accept any interleaving.

use crate::error::GraphError;
use crate::graph::{Edge, Node, VariationGraph};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Record {
    Node(Node),
    Edge(Edge),
}

pub fn write_record<W: Write>(record: &Record, output: &mut W) -> Result<(), GraphError> {
    let bytes = bincode::serialize(record)?;
    let length = u32::try_from(bytes.len()).map_err(|_| {
        GraphError::Io(std::io::Error::new(
            ErrorKind::InvalidInput,
            "record larger than 4 GiB",
        ))
    })?;
    output.write_all(&length.to_le_bytes())?;
    output.write_all(&bytes)?;
    Ok(())
}

/// Read the next record, or `None` at a clean end of stream.
pub fn read_record<R: Read>(input: &mut R) -> Result<Option<Record>, GraphError> {
    let mut prefix = [0u8; 4];
    let mut filled = 0;
    while filled < prefix.len() {
        match input.read(&mut prefix[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(GraphError::Truncated),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    let length = u32::from_le_bytes(prefix) as usize;
    // The buffer grows with the bytes actually read, not with the prefix
    let mut bytes = Vec::new();
    input.by_ref().take(length as u64).read_to_end(&mut bytes)?;
    if bytes.len() < length {
        return Err(GraphError::Truncated);
    }
    Ok(Some(bincode::deserialize(&bytes)?))
}

impl VariationGraph {
    /// Write all nodes, then all edges, as a record stream.
    pub fn serialize_to<W: Write>(&self, output: &mut W) -> Result<(), GraphError> {
        for node in self.nodes() {
            write_record(&Record::Node(node.clone()), output)?;
        }
        for edge in self.edges() {
            write_record(&Record::Edge(*edge), output)?;
        }
        Ok(())
    }

    /// Rebuild a graph from a record stream. Node ids are kept and
    /// duplicate ids are rejected.
    pub fn deserialize_from<R: Read>(input: &mut R) -> Result<Self, GraphError> {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        while let Some(record) = read_record(input)? {
            match record {
                Record::Node(node) => nodes.push(node),
                Record::Edge(edge) => edges.push(edge),
            }
        }
        VariationGraph::from_parts(nodes, edges)
    }

    pub fn save(&self, path: &str) -> Result<(), GraphError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.serialize_to(&mut writer)?;
        writer.flush()?;
        info!("Wrote {} nodes and {} edges to {}", self.node_count(), self.edge_count(), path);
        Ok(())
    }

    pub fn load(path: &str) -> Result<Self, GraphError> {
        let mut reader = BufReader::new(File::open(path)?);
        let graph = Self::deserialize_from(&mut reader)?;
        info!("Loaded {} nodes and {} edges from {}", graph.node_count(), graph.edge_count(), path);
        Ok(graph)
    }
}
