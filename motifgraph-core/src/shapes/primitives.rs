//! Constructors for the individual shape primitives.

use std::{collections::BTreeSet, ops::Range};

use rand::{Rng, seq::SliceRandom, seq::index};

use super::{LabeledGraph, RoleId};
use crate::{
    error::{GraphError, Result},
    graph::{Graph, NodeId},
};

const HOUSE_NODES: usize = 5;
const DIAMOND_NODES: usize = 6;

/// Returns the id range `start..start + count`.
///
/// Every local offset below `count` is safe to add to `start` once this
/// succeeds.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] for `start` when the range end
/// overflows [`NodeId`].
pub(crate) fn id_range(start: NodeId, count: usize) -> Result<Range<NodeId>> {
    start.checked_add(count).map(|end| start..end).ok_or_else(|| {
        GraphError::invalid(
            "start",
            format!("{count} nodes starting at {start} overflow the node id space"),
        )
    })
}

/// Builds a complete graph on `nodes` nodes, optionally stripping edges.
///
/// `remove` distinct edges are sampled without replacement and deleted. Each
/// endpoint of a removed edge has its role incremented once per removal, so
/// roles grade how many incident edges a node lost.
///
/// # Errors
/// Returns [`GraphError::TooManyRemovals`] when `remove` exceeds the number of
/// edges in the complete graph and [`GraphError::InvalidParameter`] when
/// the ids overflow.
///
/// # Examples
/// ```
/// use motifgraph_core::shapes::clique;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let shape = clique(10, 4, 1, 0, &mut rng)?;
/// assert_eq!(shape.graph.edge_count(), 5);
/// assert_eq!(shape.roles.iter().sum::<usize>(), 2);
/// # Ok::<(), motifgraph_core::GraphError>(())
/// ```
pub fn clique<R: Rng + ?Sized>(
    start: NodeId,
    nodes: usize,
    remove: usize,
    role_start: RoleId,
    rng: &mut R,
) -> Result<LabeledGraph> {
    let pairs: Vec<(usize, usize)> = (0..nodes)
        .flat_map(|i| ((i + 1)..nodes).map(move |j| (i, j)))
        .collect();
    if remove > pairs.len() {
        return Err(GraphError::TooManyRemovals {
            requested: remove,
            available: pairs.len(),
        });
    }

    let mut graph = Graph::with_nodes(id_range(start, nodes)?);
    for &(i, j) in &pairs {
        graph.add_edge(start + i, start + j)?;
    }

    let mut roles = vec![role_start; nodes];
    if remove > 0 {
        for picked in index::sample(rng, pairs.len(), remove) {
            let Some(&(i, j)) = pairs.get(picked) else {
                continue;
            };
            graph.remove_edge(start + i, start + j);
            for local in [i, j] {
                if let Some(role) = roles.get_mut(local) {
                    *role += 1;
                }
            }
        }
    }

    Ok(LabeledGraph { graph, roles })
}

/// Builds a simple ring of `length` nodes with a uniform role.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] when `length < 3` or the ids
/// overflow.
///
/// # Examples
/// ```
/// use motifgraph_core::shapes::cycle;
///
/// let shape = cycle(5, 4, 0)?;
/// let edges: Vec<_> = shape.graph.edges().map(|e| e.endpoints()).collect();
/// assert_eq!(edges, vec![(5, 6), (5, 8), (6, 7), (7, 8)]);
/// assert_eq!(shape.roles, vec![0; 4]);
/// # Ok::<(), motifgraph_core::GraphError>(())
/// ```
pub fn cycle(start: NodeId, length: usize, role_start: RoleId) -> Result<LabeledGraph> {
    if length < 3 {
        return Err(GraphError::invalid(
            "cycle.length",
            format!("a simple cycle needs at least 3 nodes (got {length})"),
        ));
    }
    let mut graph = Graph::with_nodes(id_range(start, length)?);
    for offset in 0..length - 1 {
        graph.add_edge(start + offset, start + offset + 1)?;
    }
    graph.add_edge(start + length - 1, start)?;
    Ok(LabeledGraph {
        graph,
        roles: vec![role_start; length],
    })
}

/// Builds a balanced tree of the given `height` and `branching` factor.
///
/// Local node `i` has children `branching * i + 1 ..= branching * i +
/// branching`, and all ids are shifted by `start`.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] when the node count or the
/// offset ids overflow.
///
/// # Examples
/// ```
/// use motifgraph_core::shapes::tree;
///
/// let shape = tree(3, 2, 2, 0)?;
/// assert_eq!(shape.node_count(), 7);
/// assert!(shape.graph.contains_edge(3, 4));
/// assert!(shape.graph.contains_edge(4, 6));
/// # Ok::<(), motifgraph_core::GraphError>(())
/// ```
pub fn tree(
    start: NodeId,
    height: usize,
    branching: usize,
    role_start: RoleId,
) -> Result<LabeledGraph> {
    let count = balanced_tree_size(height, branching)?;
    let mut graph = Graph::with_nodes(id_range(start, count)?);
    if branching > 0 {
        'parents: for parent in 0..count {
            for slot in 1..=branching {
                let child = parent * branching + slot;
                if child >= count {
                    break 'parents;
                }
                graph.add_edge(start + parent, start + child)?;
            }
        }
    }
    Ok(LabeledGraph {
        graph,
        roles: vec![role_start; count],
    })
}

fn balanced_tree_size(height: usize, branching: usize) -> Result<usize> {
    if branching == 0 {
        return Ok(1);
    }
    let overflow = || {
        GraphError::invalid(
            "tree",
            format!("a tree with height {height} and branching {branching} is too large"),
        )
    };
    let mut total: usize = 1;
    let mut level: usize = 1;
    for _ in 0..height {
        level = level.checked_mul(branching).ok_or_else(overflow)?;
        total = total.checked_add(level).ok_or_else(overflow)?;
    }
    Ok(total)
}

/// Builds a Barabási–Albert preferential-attachment graph on `width` nodes.
///
/// Growth starts from a star on `attach + 1` nodes. Every later node links
/// to `attach` distinct targets drawn uniformly from a list in which each
/// node appears once per incident edge, so selection is proportional to
/// degree.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] unless `1 <= attach < width`,
/// or when the ids overflow.
///
/// # Examples
/// ```
/// use motifgraph_core::shapes::ba;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let shape = ba(100, 20, 2, 0, &mut rng)?;
/// assert_eq!(shape.node_count(), 20);
/// assert_eq!(shape.graph.edge_count(), 2 + (20 - 3) * 2);
/// # Ok::<(), motifgraph_core::GraphError>(())
/// ```
pub fn ba<R: Rng + ?Sized>(
    start: NodeId,
    width: usize,
    attach: usize,
    role_start: RoleId,
    rng: &mut R,
) -> Result<LabeledGraph> {
    if attach == 0 || attach >= width {
        return Err(GraphError::invalid(
            "ba.attach",
            format!("attachment count must satisfy 1 <= attach < width (attach={attach}, width={width})"),
        ));
    }

    let mut graph = Graph::with_nodes(id_range(start, width)?);
    let mut repeated: Vec<NodeId> = Vec::with_capacity(2 * attach * width);
    for leaf in 1..=attach {
        graph.add_edge(start, start + leaf)?;
        repeated.push(start);
        repeated.push(start + leaf);
    }

    for source in (attach + 1)..width {
        let targets = degree_weighted_targets(&repeated, attach, rng);
        for &target in &targets {
            graph.add_edge(start + source, target)?;
        }
        repeated.extend(targets);
        repeated.extend(std::iter::repeat_n(start + source, attach));
    }

    Ok(LabeledGraph {
        graph,
        roles: vec![role_start; width],
    })
}

/// Draws `count` distinct nodes from `repeated`, uniformly per entry.
fn degree_weighted_targets<R: Rng + ?Sized>(
    repeated: &[NodeId],
    count: usize,
    rng: &mut R,
) -> BTreeSet<NodeId> {
    let mut targets = BTreeSet::new();
    while targets.len() < count {
        match repeated.choose(rng) {
            Some(&node) => {
                targets.insert(node);
            }
            None => break,
        }
    }
    targets
}

/// Builds a 6-node ring with chords `(5, 1)` and `(4, 2)` (offset by
/// `start`), giving two triangular faces.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] when the ids overflow.
pub fn diamond(start: NodeId, role_start: RoleId) -> Result<LabeledGraph> {
    let mut shape = cycle(start, DIAMOND_NODES, role_start)?;
    shape.graph.add_edge(start + 5, start + 1)?;
    shape.graph.add_edge(start + 4, start + 2)?;
    Ok(shape)
}

/// Builds the 5-node house motif.
///
/// Walls form the ring `0-1-2-3-0` and the roof apex `4` joins nodes `0`
/// and `1`. Roles are `[r, r, r + 1, r + 1, r + 2]` for `r = role_start`.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] when the ids overflow.
///
/// # Examples
/// ```
/// use motifgraph_core::shapes::house;
///
/// let shape = house(0, 0)?;
/// let edges: Vec<_> = shape.graph.edges().map(|e| e.endpoints()).collect();
/// assert_eq!(edges, vec![(0, 1), (0, 3), (0, 4), (1, 2), (1, 4), (2, 3)]);
/// assert_eq!(shape.roles, vec![0, 0, 1, 1, 2]);
/// # Ok::<(), motifgraph_core::GraphError>(())
/// ```
pub fn house(start: NodeId, role_start: RoleId) -> Result<LabeledGraph> {
    let mut graph = Graph::with_nodes(id_range(start, HOUSE_NODES)?);
    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0), (4, 0), (4, 1)] {
        graph.add_edge(start + a, start + b)?;
    }
    Ok(LabeledGraph {
        graph,
        roles: vec![
            role_start,
            role_start,
            role_start + 1,
            role_start + 1,
            role_start + 2,
        ],
    })
}

/// Builds a `rows x cols` lattice. Node `start + r * cols + c` links to its
/// right and down neighbours.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] when either dimension is zero
/// or the ids overflow.
pub fn grid(start: NodeId, rows: usize, cols: usize, role_start: RoleId) -> Result<LabeledGraph> {
    if rows == 0 || cols == 0 {
        return Err(GraphError::invalid(
            "grid",
            format!("dimensions must be positive (got {rows}x{cols})"),
        ));
    }
    let count = rows
        .checked_mul(cols)
        .ok_or_else(|| GraphError::invalid("grid", format!("{rows}x{cols} is too large")))?;
    let mut graph = Graph::with_nodes(id_range(start, count)?);
    let node_id = |r: usize, c: usize| start + r * cols + c;

    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                graph.add_edge(node_id(r, c), node_id(r, c + 1))?;
            }
            if r + 1 < rows {
                graph.add_edge(node_id(r, c), node_id(r + 1, c))?;
            }
        }
    }
    Ok(LabeledGraph {
        graph,
        roles: vec![role_start; count],
    })
}
