//! Conversion of assembled graphs into model-ready arrays.

use crate::{
    assembler::SyntheticGraph,
    error::{GraphError, Result},
    graph::{Graph, NodeId},
    shapes::RoleId,
};

/// Width of the per-node feature vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FeatureDim {
    /// One slot per observed degree, `max_degree + 1` in total.
    #[default]
    Auto,
    /// A fixed number of slots; degrees beyond the last slot are clamped.
    Fixed(usize),
}

impl FeatureDim {
    /// Resolves the dimension for `graph`.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] for `Fixed(0)`.
    pub fn resolve(self, graph: &Graph) -> Result<usize> {
        match self {
            Self::Auto => Ok(graph.max_degree() + 1),
            Self::Fixed(0) => Err(GraphError::invalid(
                "feature_dim",
                "a fixed feature dimension must be positive",
            )),
            Self::Fixed(dim) => Ok(dim),
        }
    }
}

/// Encodes each node's degree as a one-hot row, in ascending node order.
///
/// Degrees at or above `dim - 1` share the last slot.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] when `dim` is zero.
///
/// # Examples
/// ```
/// use motifgraph_core::{encode::encode_degree_one_hot, shapes::cycle};
///
/// let ring = cycle(0, 3, 0)?;
/// let rows = encode_degree_one_hot(&ring.graph, 2)?;
/// assert_eq!(rows, vec![vec![0.0, 1.0]; 3]);
/// # Ok::<(), motifgraph_core::GraphError>(())
/// ```
pub fn encode_degree_one_hot(graph: &Graph, dim: usize) -> Result<Vec<Vec<f32>>> {
    let last = dim
        .checked_sub(1)
        .ok_or_else(|| GraphError::invalid("feature_dim", "dimension must be positive"))?;
    Ok(graph
        .nodes()
        .map(|node| {
            let mut row = vec![0.0_f32; dim];
            if let Some(slot) = row.get_mut(graph.degree(node).min(last)) {
                *slot = 1.0;
            }
            row
        })
        .collect())
}

/// Returns the edges in coordinate form with both directions present,
/// sorted by source then target.
#[must_use]
pub fn edge_index(graph: &Graph) -> Vec<[NodeId; 2]> {
    graph
        .nodes()
        .flat_map(|source| graph.neighbours(source).map(move |target| [source, target]))
        .collect()
}

/// Node features, connectivity and labels ready for a graph model.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedGraph {
    /// One feature row per node.
    pub features: Vec<Vec<f32>>,
    /// Directed edge pairs, both orientations of every undirected edge.
    pub edge_index: Vec<[NodeId; 2]>,
    /// Role label per node.
    pub labels: Vec<RoleId>,
}

impl EncodedGraph {
    /// Encodes a synthetic graph with one-hot degree features.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] when `dim` resolves to zero.
    pub fn from_synthetic(synthetic: &SyntheticGraph, dim: FeatureDim) -> Result<Self> {
        let width = dim.resolve(&synthetic.graph)?;
        Ok(Self {
            features: encode_degree_one_hot(&synthetic.graph, width)?,
            edge_index: edge_index(&synthetic.graph),
            labels: synthetic.roles.clone(),
        })
    }

    /// Returns the feature width, or zero when there are no nodes.
    #[must_use]
    pub fn feature_dim(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasisKind, BuildConfig, ShapeSpec, build_graph};
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    #[rstest]
    fn auto_dimension_tracks_max_degree() {
        let config = BuildConfig::new(BasisKind::Cycle, 8).with_shape(ShapeSpec::House);
        let built = build_graph(&config, &mut SmallRng::seed_from_u64(1)).expect("graph builds");
        let encoded = EncodedGraph::from_synthetic(&built, FeatureDim::Auto).expect("encodes");
        assert_eq!(encoded.feature_dim(), built.graph.max_degree() + 1);
        assert_eq!(encoded.features.len(), built.graph.node_count());
        assert_eq!(encoded.labels, built.roles);
        assert_eq!(encoded.edge_index.len(), 2 * built.graph.edge_count());
    }

    #[rstest]
    fn fixed_dimension_clamps_large_degrees() {
        let mut graph = Graph::new();
        for leaf in 1..=4 {
            graph.add_edge(0, leaf).expect("valid edge");
        }
        let rows = encode_degree_one_hot(&graph, 3).expect("encodes");
        assert_eq!(rows.first(), Some(&vec![0.0, 0.0, 1.0]));
        assert_eq!(rows.get(1), Some(&vec![0.0, 1.0, 0.0]));
    }

    #[rstest]
    fn zero_dimension_is_rejected() {
        let graph = Graph::with_nodes(0..2);
        assert!(FeatureDim::Fixed(0).resolve(&graph).is_err());
        assert!(encode_degree_one_hot(&graph, 0).is_err());
    }

    #[rstest]
    fn edge_index_is_symmetric() {
        let mut graph = Graph::new();
        graph.add_edge(0, 2).expect("valid edge");
        assert_eq!(edge_index(&graph), vec![[0, 2], [2, 0]]);
    }
}
