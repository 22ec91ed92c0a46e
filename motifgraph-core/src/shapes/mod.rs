//! Shape primitives and motif specifications.
//!
//! Each primitive builds a small graph whose node ids start at a caller
//! supplied offset, paired with one role label per node. Primitives that
//! need randomness take the generator explicitly so callers control seeding.

mod primitives;
mod spec;

pub(crate) use primitives::id_range;
pub use primitives::{ba, clique, cycle, diamond, grid, house, tree};
pub use spec::{ShapeKind, ShapeSpec};

use crate::graph::Graph;

/// Integer tag describing the structural role of a node.
pub type RoleId = usize;

/// A graph paired with one role label per node, in ascending node order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledGraph {
    /// Nodes and edges of the fragment.
    pub graph: Graph,
    /// Role label for each node, ordered by node id.
    pub roles: Vec<RoleId>,
}

impl LabeledGraph {
    /// Returns the number of nodes in the fragment.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}
