use crate::builder::ReferencePath;
use crate::graph::{Edge, NodeId, VariationGraph};
use std::io::{self, Write};

impl VariationGraph {
    /// Write graph in GFA format. All links are forward to forward; empty
    /// sentinel nodes are written with `*` as their sequence.
    pub fn write_gfa<W: Write>(&self, paths: &[ReferencePath], writer: &mut W) -> io::Result<()> {
        writeln!(writer, "H\tVN:Z:1.0")?;

        let mut node_ids: Vec<NodeId> = self.nodes().iter().map(|node| node.id).collect();
        node_ids.sort_unstable();
        for node_id in node_ids {
            if let Some(node) = self.node(node_id) {
                if node.is_empty() {
                    writeln!(writer, "S\t{}\t*", node_id)?;
                } else {
                    writeln!(writer, "S\t{}\t{}", node_id, node.sequence_string())?;
                }
            }
        }

        let mut edges: Vec<Edge> = self.edges().to_vec();
        edges.sort_unstable();
        for edge in edges {
            writeln!(writer, "L\t{}\t+\t{}\t+\t0M", edge.from, edge.to)?;
        }

        for path in paths {
            let steps: Vec<String> = path.steps.iter().map(|id| format!("{}+", id)).collect();
            writeln!(writer, "P\t{}\t{}\t*", path.name, steps.join(","))?;
        }

        Ok(())
    }
}
