use std::collections::{BTreeMap, BTreeSet};

use crate::model::types::NodeId;

/// Directed graph over pseudoexon numbers, the union of transcript paths.
///
/// Adjacency is kept in ordered sets so traversal is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathGraph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    endpoints: BTreeSet<(NodeId, NodeId)>,
}

impl PathGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from transcript paths. Paths with fewer than two nodes carry no
    /// edge and are skipped.
    pub fn from_paths<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a [NodeId]>,
    {
        let mut graph = Self::new();
        for path in paths {
            graph.add_path(path);
        }
        graph
    }

    /// Add the edge chain of one path and record its `(min, max)` pair.
    ///
    /// Returns false (and leaves the graph untouched) for paths shorter than
    /// two nodes.
    pub fn add_path(&mut self, path: &[NodeId]) -> bool {
        let (Some(&lo), Some(&hi)) = (path.iter().min(), path.iter().max()) else {
            return false;
        };
        if path.len() < 2 {
            return false;
        }

        for &node in path {
            self.adjacency.entry(node).or_default();
        }
        for w in path.windows(2) {
            if w[0] != w[1] {
                self.adjacency.entry(w[0]).or_default().insert(w[1]);
            }
        }
        self.endpoints.insert((lo, hi));
        true
    }

    /// Distinct `(min, max)` pairs of the added paths, ascending.
    pub fn endpoints(&self) -> &BTreeSet<(NodeId, NodeId)> {
        &self.endpoints
    }

    /// Successors of `node` in ascending order.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&node).into_iter().flatten().copied()
    }

    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.adjacency.get(&from).is_some_and(|s| s.contains(&to))
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
