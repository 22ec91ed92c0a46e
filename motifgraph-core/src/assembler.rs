//! Assembly of a basis graph with grafted motifs.
//!
//! Provides [`build_graph`], which builds the basis, chooses plug-in nodes,
//! attaches each motif with a single bridging edge, assigns role labels
//! per motif kind and finally sprinkles optional random edges.

use std::collections::BTreeMap;

use rand::{Rng, seq::index};
use tracing::{Span, debug, field, instrument};

use crate::{
    config::{BuildConfig, RandomEdgePolicy},
    error::{GraphError, Result},
    graph::{Graph, NodeId},
    shapes::{RoleId, ShapeKind, id_range},
};

/// Where and how one motif was attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotifPlacement {
    /// Kind of the motif.
    pub kind: ShapeKind,
    /// First node id of the motif; this node carries the bridging edge.
    pub first_node: NodeId,
    /// Number of nodes contributed by the motif.
    pub node_count: usize,
    /// Basis node the bridging edge terminates on.
    pub plugin: NodeId,
    /// Offset added to the motif's local role labels.
    pub role_offset: RoleId,
}

impl MotifPlacement {
    /// Returns the node ids occupied by the motif.
    #[must_use]
    pub const fn nodes(&self) -> std::ops::Range<NodeId> {
        self.first_node..self.first_node.saturating_add(self.node_count)
    }
}

/// Output of [`build_graph`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntheticGraph {
    /// The assembled graph.
    pub graph: Graph,
    /// Role label per node, ordered by node id.
    pub roles: Vec<RoleId>,
    /// Basis node each motif is attached to, in motif order.
    pub plugins: Vec<NodeId>,
    /// Placement record per motif, in motif order.
    pub motifs: Vec<MotifPlacement>,
    /// First node id of the assembled graph.
    pub start: NodeId,
    /// Number of nodes that belong to the basis.
    pub basis_nodes: usize,
}

impl SyntheticGraph {
    /// Returns the role label of `node`, if it belongs to the graph.
    #[must_use]
    pub fn role_of(&self, node: NodeId) -> Option<RoleId> {
        node.checked_sub(self.start)
            .and_then(|offset| self.roles.get(offset).copied())
    }

    /// Returns the number of distinct role labels in use.
    #[must_use]
    pub fn role_count(&self) -> usize {
        self.roles.iter().max().map_or(0, |max| max + 1)
    }
}

/// Builds a basis graph and grafts every configured motif onto it.
///
/// Motifs of a kind seen for the first time take the role offset
/// `max(roles so far) + 1`; later motifs of the same kind reuse it.
///
/// # Errors
/// Returns [`GraphError::PluginsExceedBasis`] when there are more motifs
/// than basis nodes, [`GraphError::InsufficientNonEdges`] when
/// [`RandomEdgePolicy::DistinctNew`] cannot be satisfied, and
/// [`GraphError::InvalidParameter`] when node ids counted from `start`
/// would overflow. Primitive failures are propagated.
///
/// # Examples
/// ```
/// use motifgraph_core::{BasisKind, BuildConfig, ShapeSpec, build_graph};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let config = BuildConfig::new(BasisKind::Cycle, 10).with_shape(ShapeSpec::House);
/// let mut rng = SmallRng::seed_from_u64(0);
/// let built = build_graph(&config, &mut rng)?;
/// assert_eq!(built.graph.node_count(), 15);
/// assert_eq!(built.plugins, vec![0]);
/// assert!(built.graph.contains_edge(10, 0));
/// assert_eq!(&built.roles[10..], &[1, 1, 2, 2, 3]);
/// # Ok::<(), motifgraph_core::GraphError>(())
/// ```
#[instrument(
    name = "graph.build",
    err,
    skip(config, rng),
    fields(
        basis = %config.basis(),
        width = config.width(),
        shapes = config.shapes().len(),
        nodes = field::Empty,
        edges = field::Empty,
    ),
)]
pub fn build_graph<R: Rng + ?Sized>(config: &BuildConfig, rng: &mut R) -> Result<SyntheticGraph> {
    let basis = config
        .basis()
        .instantiate(config.start(), config.width(), config.param(), rng)?;
    let basis_nodes = basis.node_count();
    let mut graph = basis.graph;
    let mut roles = basis.roles;
    let mut cursor = id_range(config.start(), basis_nodes)?.end;

    let plugins = choose_plugins(config, basis_nodes, rng)?;
    let mut offsets: BTreeMap<ShapeKind, RoleId> = BTreeMap::new();
    let mut motifs = Vec::with_capacity(config.shapes().len());

    for (shape, &plugin) in config.shapes().iter().zip(&plugins) {
        let motif = shape.instantiate(cursor, 0, rng)?;
        let kind = shape.kind();
        let role_offset = *offsets
            .entry(kind)
            .or_insert_with(|| roles.iter().max().map_or(0, |max| max + 1));

        graph.merge(&motif.graph);
        graph.add_edge(cursor, plugin)?;
        roles.extend(motif.roles.iter().map(|role| role + role_offset));

        let placement = MotifPlacement {
            kind,
            first_node: cursor,
            node_count: motif.node_count(),
            plugin,
            role_offset,
        };
        debug!(
            kind = %kind,
            first_node = placement.first_node,
            nodes = placement.node_count,
            plugin,
            role_offset,
            "attached motif"
        );
        motifs.push(placement);
        cursor = id_range(cursor, motif.node_count())?.end;
    }

    add_random_edges(
        &mut graph,
        config.extra_random_edges(),
        config.random_edge_policy(),
        rng,
    )?;

    let span = Span::current();
    span.record("nodes", graph.node_count());
    span.record("edges", graph.edge_count());

    Ok(SyntheticGraph {
        graph,
        roles,
        plugins,
        motifs,
        start: config.start(),
        basis_nodes,
    })
}

/// Picks one distinct basis node per motif.
fn choose_plugins<R: Rng + ?Sized>(
    config: &BuildConfig,
    basis_nodes: usize,
    rng: &mut R,
) -> Result<Vec<NodeId>> {
    let shapes = config.shapes().len();
    if shapes == 0 {
        return Ok(Vec::new());
    }
    if shapes > basis_nodes {
        return Err(GraphError::PluginsExceedBasis {
            shapes,
            basis_nodes,
        });
    }

    let start = config.start();
    if config.random_plugins() {
        return Ok(index::sample(rng, basis_nodes, shapes)
            .into_iter()
            .map(|position| start + position)
            .collect());
    }

    let spacing = basis_nodes / shapes;
    Ok((0..shapes).map(|k| start + k * spacing).collect())
}

/// Adds `count` random edges between distinct nodes according to `policy`.
fn add_random_edges<R: Rng + ?Sized>(
    graph: &mut Graph,
    count: usize,
    policy: RandomEdgePolicy,
    rng: &mut R,
) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    let nodes: Vec<NodeId> = graph.nodes().collect();
    if nodes.len() < 2 {
        return Err(GraphError::invalid(
            "extra_random_edges",
            format!("random edges need at least 2 nodes (graph has {})", nodes.len()),
        ));
    }

    match policy {
        RandomEdgePolicy::AllowRepeats => {
            let mut absorbed = 0_usize;
            for _ in 0..count {
                let (a, b) = sample_pair(&nodes, rng)?;
                if !graph.add_edge(a, b)? {
                    absorbed += 1;
                }
            }
            debug!(requested = count, absorbed, "added random edges");
        }
        RandomEdgePolicy::DistinctNew => {
            let available = graph.non_edge_count();
            if count > available {
                return Err(GraphError::InsufficientNonEdges {
                    requested: count,
                    available,
                });
            }
            let mut added = 0_usize;
            while added < count {
                let (a, b) = sample_pair(&nodes, rng)?;
                if graph.add_edge(a, b)? {
                    added += 1;
                }
            }
            debug!(requested = count, "added distinct random edges");
        }
    }
    Ok(())
}

fn sample_pair<R: Rng + ?Sized>(nodes: &[NodeId], rng: &mut R) -> Result<(NodeId, NodeId)> {
    let picked = index::sample(rng, nodes.len(), 2);
    let lookup = |position: usize| {
        nodes
            .get(position)
            .copied()
            .ok_or_else(|| GraphError::invalid("extra_random_edges", "sampled node out of range"))
    };
    Ok((lookup(picked.index(0))?, lookup(picked.index(1))?))
}
