use crate::error::GraphError;
use crate::graph::{NodeId, VariationGraph};
use crate::path_map::PathMap;
use tracing::trace;

impl VariationGraph {
    /// Split a node at `offset` into a prefix node and a suffix node.
    ///
    /// Edges into the old node now enter `left`, edges out of it now leave
    /// `right`, and `left -> right` is added. The old node is destroyed.
    pub fn divide_node(&mut self, id: NodeId, offset: usize) -> Result<(NodeId, NodeId), GraphError> {
        let sequence = match self.node(id) {
            Some(node) => node.sequence.clone(),
            None => return Err(GraphError::NodeNotFound(id)),
        };
        if offset > sequence.len() {
            return Err(GraphError::InvalidOffset {
                node: id,
                offset,
                length: sequence.len(),
            });
        }
        let predecessors = self.predecessors(id);
        let successors = self.successors(id);

        let left = self.create_node(sequence[..offset].to_vec());
        for from in predecessors {
            self.create_edge(from, left);
        }
        let right = self.create_node(sequence[offset..].to_vec());
        for to in successors {
            self.create_edge(right, to);
        }
        self.create_edge(left, right);

        self.destroy_node(id)?;
        trace!("Divided node {} at {} into {} and {}", id, offset, left, right);
        Ok((left, right))
    }

    /// Make sure a breakpoint exists at `position` on a reference path and
    /// return the nodes ending and starting there.
    ///
    /// An existing breakpoint is reused without touching the graph. Otherwise
    /// the node covering `position` is divided and both halves are recorded
    /// in the path.
    pub fn divide_path(&mut self, path: &mut PathMap, position: i64) -> Result<(NodeId, NodeId), GraphError> {
        let (key, target) = path.floor(position).ok_or(GraphError::InvalidCoordinate {
            position,
            reason: "before the start of the path",
        })?;

        if key == position {
            let (_, left) = path.predecessor(position).ok_or(GraphError::InvalidCoordinate {
                position,
                reason: "no node ends at this position",
            })?;
            return Ok((left, target));
        }

        let length = self.node(target).ok_or(GraphError::NodeNotFound(target))?.len();
        let offset = (position - key) as usize;
        if offset >= length {
            return Err(GraphError::InvalidCoordinate {
                position,
                reason: "past the end of the path",
            });
        }

        let (left, right) = self.divide_node(target, offset)?;
        path.insert(key, left);
        path.insert(position, right);
        Ok((left, right))
    }
}
