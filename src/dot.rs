use crate::graph::VariationGraph;
use std::io::{self, Write};

impl VariationGraph {
    /// Write the graph in Graphviz dot format, labelling nodes with
    /// `id:sequence`.
    pub fn write_dot<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "digraph graphname {{")?;
        writeln!(writer, "    node [shape=plaintext];")?;
        for node in self.nodes() {
            writeln!(
                writer,
                "    {} [label=\"{}:{}\"];",
                node.id,
                node.id,
                node.sequence_string()
            )?;
        }
        for edge in self.edges() {
            writeln!(writer, "    {} -> {};", edge.from, edge.to)?;
        }
        writeln!(writer, "}}")?;
        Ok(())
    }
}
