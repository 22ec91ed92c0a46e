//! Undirected simple graph used as the substrate for synthetic datasets.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{GraphError, Result};

/// Identifier of a node within a [`Graph`].
pub type NodeId = usize;

/// An undirected edge stored with its endpoints in ascending order.
///
/// # Examples
/// ```
/// use motifgraph_core::Edge;
///
/// let edge = Edge::new(4, 1).expect("distinct endpoints");
/// assert_eq!((edge.low(), edge.high()), (1, 4));
/// assert_eq!(edge, Edge::new(1, 4).expect("distinct endpoints"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    low: NodeId,
    high: NodeId,
}

impl Edge {
    /// Creates an edge between `a` and `b`, normalising endpoint order.
    ///
    /// # Errors
    /// Returns [`GraphError::SelfLoop`] when `a == b`.
    pub fn new(a: NodeId, b: NodeId) -> Result<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Ok(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => Err(GraphError::SelfLoop { node: a }),
        }
    }

    /// Returns the smaller endpoint.
    #[must_use]
    pub const fn low(self) -> NodeId {
        self.low
    }

    /// Returns the larger endpoint.
    #[must_use]
    pub const fn high(self) -> NodeId {
        self.high
    }

    /// Returns the endpoints as a `(low, high)` tuple.
    #[must_use]
    pub const fn endpoints(self) -> (NodeId, NodeId) {
        (self.low, self.high)
    }
}

/// Undirected simple graph with ordered node and edge iteration.
///
/// Adding an edge that already exists is a no-op and self-loops are
/// rejected, so the structure always stays simple.
///
/// # Examples
/// ```
/// use motifgraph_core::Graph;
///
/// let mut graph = Graph::new();
/// graph.add_edge(0, 1)?;
/// graph.add_edge(1, 0)?;
/// graph.add_node(7);
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.degree(1), 1);
/// # Ok::<(), motifgraph_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    edge_count: usize,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph holding the nodes `range` and no edges.
    #[must_use]
    pub fn with_nodes(range: std::ops::Range<NodeId>) -> Self {
        let mut graph = Self::new();
        for node in range {
            graph.add_node(node);
        }
        graph
    }

    /// Inserts `node` if it is not already present.
    pub fn add_node(&mut self, node: NodeId) {
        self.adjacency.entry(node).or_default();
    }

    /// Inserts the undirected edge `(a, b)`, adding missing endpoints.
    ///
    /// Returns `true` when the edge was not present before.
    ///
    /// # Errors
    /// Returns [`GraphError::SelfLoop`] when `a == b`.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        let edge = Edge::new(a, b)?;
        Ok(self.insert_edge(edge))
    }

    /// Inserts an already normalised edge. Returns `true` if it was new.
    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        let (low, high) = edge.endpoints();
        let inserted = self.adjacency.entry(low).or_default().insert(high);
        self.adjacency.entry(high).or_default().insert(low);
        if inserted {
            self.edge_count += 1;
        }
        inserted
    }

    /// Removes the edge `(a, b)` if present. Returns `true` if it existed.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let removed = self
            .adjacency
            .get_mut(&a)
            .is_some_and(|neighbours| neighbours.remove(&b));
        if removed {
            if let Some(neighbours) = self.adjacency.get_mut(&b) {
                neighbours.remove(&a);
            }
            self.edge_count -= 1;
        }
        removed
    }

    /// Returns whether the undirected edge `(a, b)` exists.
    #[must_use]
    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|neighbours| neighbours.contains(&b))
    }

    /// Returns whether `node` is part of the graph.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterates over node identifiers in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Iterates over edges in ascending `(low, high)` order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency.iter().flat_map(|(&low, neighbours)| {
            neighbours
                .range((low + 1)..)
                .map(move |&high| Edge { low, high })
        })
    }

    /// Iterates over the neighbours of `node` in ascending order.
    pub fn neighbours(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(|neighbours| neighbours.iter().copied())
    }

    /// Returns the degree of `node`, or zero when the node is absent.
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map_or(0, BTreeSet::len)
    }

    /// Returns the largest degree in the graph, or zero when it is empty.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).max().unwrap_or(0)
    }

    /// Returns the number of node pairs that are not yet joined by an edge.
    #[must_use]
    pub fn non_edge_count(&self) -> usize {
        let n = self.node_count();
        let pairs = n.saturating_mul(n.saturating_sub(1)) / 2;
        pairs.saturating_sub(self.edge_count)
    }

    /// Copies every node and edge of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        for node in other.nodes() {
            self.add_node(node);
        }
        for edge in other.edges() {
            self.insert_edge(edge);
        }
    }

    /// Returns `true` when node ids form the contiguous range
    /// `start..start + node_count`.
    #[must_use]
    pub fn is_contiguous_from(&self, start: NodeId) -> bool {
        self.nodes()
            .enumerate()
            .all(|(offset, node)| start.checked_add(offset) == Some(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn edge_rejects_self_loops() {
        let err = Edge::new(3, 3).expect_err("self-loop must fail");
        assert_eq!(err, GraphError::SelfLoop { node: 3 });
    }

    #[rstest]
    fn duplicate_edges_are_absorbed() {
        let mut graph = Graph::new();
        assert!(graph.add_edge(0, 1).expect("valid edge"));
        assert!(!graph.add_edge(1, 0).expect("valid edge"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[rstest]
    fn edges_iterate_in_ascending_order() {
        let mut graph = Graph::new();
        graph.add_edge(2, 0).expect("valid edge");
        graph.add_edge(1, 0).expect("valid edge");
        graph.add_edge(2, 1).expect("valid edge");
        let edges: Vec<_> = graph.edges().map(Edge::endpoints).collect();
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[rstest]
    fn remove_edge_updates_both_sides() {
        let mut graph = Graph::new();
        graph.add_edge(0, 1).expect("valid edge");
        assert!(graph.remove_edge(1, 0));
        assert!(!graph.contains_edge(0, 1));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 2);
        assert!(!graph.remove_edge(0, 1));
    }

    #[rstest]
    fn merge_copies_nodes_and_edges() {
        let mut left = Graph::with_nodes(0..3);
        left.add_edge(0, 1).expect("valid edge");
        let mut right = Graph::with_nodes(3..5);
        right.add_edge(3, 4).expect("valid edge");
        left.merge(&right);
        assert_eq!(left.node_count(), 5);
        assert_eq!(left.edge_count(), 2);
        assert!(left.is_contiguous_from(0));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(4, 6)]
    fn non_edge_count_of_empty_graph(#[case] nodes: usize, #[case] expected: usize) {
        let graph = Graph::with_nodes(0..nodes);
        assert_eq!(graph.non_edge_count(), expected);
    }
}
