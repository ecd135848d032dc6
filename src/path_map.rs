use crate::graph::NodeId;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Position of the sentinel placed before the first base of a reference.
pub const HEAD_POSITION: i64 = -1;

/// Ordered map from reference coordinate to the node whose sequence starts
/// there. The node at key `k` covers `[k, next key)`.
///
/// Besides the reference nodes, the map may hold an empty sentinel at
/// [`HEAD_POSITION`] and one at the reference length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathMap {
    entries: BTreeMap<i64, NodeId>,
}

impl PathMap {
    pub fn new() -> Self {
        PathMap {
            entries: BTreeMap::new(),
        }
    }

    /// A path consisting of one node covering the whole sequence.
    pub fn seeded(node: NodeId) -> Self {
        let mut path = PathMap::new();
        path.insert(0, node);
        path
    }

    pub fn insert(&mut self, position: i64, node: NodeId) -> Option<NodeId> {
        self.entries.insert(position, node)
    }

    pub fn get(&self, position: i64) -> Option<NodeId> {
        self.entries.get(&position).copied()
    }

    pub fn contains(&self, position: i64) -> bool {
        self.entries.contains_key(&position)
    }

    /// The entry with the greatest key not above `position`.
    pub fn floor(&self, position: i64) -> Option<(i64, NodeId)> {
        self.entries
            .range(..=position)
            .next_back()
            .map(|(&key, &node)| (key, node))
    }

    /// The entry with the greatest key strictly below `position`.
    pub fn predecessor(&self, position: i64) -> Option<(i64, NodeId)> {
        self.entries
            .range((Bound::Unbounded, Bound::Excluded(position)))
            .next_back()
            .map(|(&key, &node)| (key, node))
    }

    pub fn first(&self) -> Option<(i64, NodeId)> {
        self.entries.first_key_value().map(|(&key, &node)| (key, node))
    }

    pub fn last(&self) -> Option<(i64, NodeId)> {
        self.entries.last_key_value().map(|(&key, &node)| (key, node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, NodeId)> + '_ {
        self.entries.iter().map(|(&key, &node)| (key, node))
    }

    /// Node ids in coordinate order, i.e. the current reference path.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.entries.values().copied().collect()
    }
}
