//! Configuration surface for assembling synthetic graphs.
//!
//! [`BuildConfig`] collects the basis topology, the motifs to graft and the
//! randomisation options before [`crate::build_graph`] runs.

use std::{fmt, str::FromStr};

use rand::Rng;

use crate::{
    error::{GraphError, Result},
    graph::NodeId,
    shapes::{self, LabeledGraph, ShapeSpec},
};

const DEFAULT_PARAM: usize = 5;

/// Topology used for the large backbone graph.
///
/// The shared `param` of a [`BuildConfig`] is forwarded as the branching
/// factor for [`BasisKind::Tree`], the attachment count for
/// [`BasisKind::Ba`] and the column count for [`BasisKind::Grid`]. Cliques
/// and cycles ignore it.
///
/// # Examples
/// ```
/// use motifgraph_core::BasisKind;
///
/// let basis: BasisKind = "ba".parse()?;
/// assert_eq!(basis, BasisKind::Ba);
/// assert_eq!(basis.to_string(), "ba");
/// # Ok::<(), motifgraph_core::GraphError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BasisKind {
    /// Complete graph on `width` nodes.
    Clique,
    /// Ring of `width` nodes.
    Cycle,
    /// Balanced tree of height `width` and branching `param`.
    Tree,
    /// Barabási–Albert graph on `width` nodes with `param` attachments.
    Ba,
    /// Lattice with `width` rows and `param` columns.
    Grid,
}

impl BasisKind {
    /// Returns the name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clique => "clique",
            Self::Cycle => "cycle",
            Self::Tree => "tree",
            Self::Ba => "ba",
            Self::Grid => "grid",
        }
    }

    /// Builds the basis graph with node ids starting at `start` and all
    /// roles set to zero.
    ///
    /// # Errors
    /// Propagates the [`GraphError`] raised by the underlying primitive.
    pub fn instantiate<R: Rng + ?Sized>(
        self,
        start: NodeId,
        width: usize,
        param: usize,
        rng: &mut R,
    ) -> Result<LabeledGraph> {
        match self {
            Self::Clique => shapes::clique(start, width, 0, 0, rng),
            Self::Cycle => shapes::cycle(start, width, 0),
            Self::Tree => shapes::tree(start, width, param, 0),
            Self::Ba => shapes::ba(start, width, param, 0, rng),
            Self::Grid => shapes::grid(start, width, param, 0),
        }
    }
}

impl fmt::Display for BasisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BasisKind {
    type Err = GraphError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "clique" => Ok(Self::Clique),
            "cycle" => Ok(Self::Cycle),
            "tree" => Ok(Self::Tree),
            "ba" => Ok(Self::Ba),
            "grid" => Ok(Self::Grid),
            other => Err(GraphError::UnknownBasis {
                name: other.to_owned(),
            }),
        }
    }
}

/// How extra random edges treat node pairs that are already connected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RandomEdgePolicy {
    /// Draw exactly the requested number of pairs. Pairs that are already
    /// joined are absorbed, so the graph may gain fewer edges.
    #[default]
    AllowRepeats,
    /// Keep drawing until the requested number of new edges was added.
    DistinctNew,
}

/// Parameters for [`crate::build_graph`].
///
/// # Examples
/// ```
/// use motifgraph_core::{BasisKind, BuildConfig, RandomEdgePolicy, ShapeSpec};
///
/// let config = BuildConfig::new(BasisKind::Ba, 40)
///     .with_shapes([ShapeSpec::House, ShapeSpec::House])
///     .with_random_plugins(true)
///     .with_extra_random_edges(3)
///     .with_random_edge_policy(RandomEdgePolicy::DistinctNew)
///     .with_param(2);
/// assert_eq!(config.shapes().len(), 2);
/// assert_eq!(config.param(), 2);
/// assert_eq!(config.start(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    basis: BasisKind,
    width: usize,
    shapes: Vec<ShapeSpec>,
    start: NodeId,
    random_plugins: bool,
    extra_random_edges: usize,
    random_edge_policy: RandomEdgePolicy,
    param: usize,
}

impl BuildConfig {
    /// Creates a configuration with no motifs and default options.
    #[must_use]
    pub const fn new(basis: BasisKind, width: usize) -> Self {
        Self {
            basis,
            width,
            shapes: Vec::new(),
            start: 0,
            random_plugins: false,
            extra_random_edges: 0,
            random_edge_policy: RandomEdgePolicy::AllowRepeats,
            param: DEFAULT_PARAM,
        }
    }

    /// Replaces the ordered motif list.
    #[must_use]
    pub fn with_shapes(mut self, shapes: impl IntoIterator<Item = ShapeSpec>) -> Self {
        self.shapes = shapes.into_iter().collect();
        self
    }

    /// Appends one motif to the list.
    #[must_use]
    pub fn with_shape(mut self, shape: ShapeSpec) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Sets the first node id of the assembled graph.
    #[must_use]
    pub fn with_start(mut self, start: NodeId) -> Self {
        self.start = start;
        self
    }

    /// Chooses plug-ins by sampling instead of even spacing.
    #[must_use]
    pub fn with_random_plugins(mut self, random: bool) -> Self {
        self.random_plugins = random;
        self
    }

    /// Sets how many random edges to add after motifs are attached.
    #[must_use]
    pub fn with_extra_random_edges(mut self, count: usize) -> Self {
        self.extra_random_edges = count;
        self
    }

    /// Sets the duplicate handling for extra random edges.
    #[must_use]
    pub fn with_random_edge_policy(mut self, policy: RandomEdgePolicy) -> Self {
        self.random_edge_policy = policy;
        self
    }

    /// Sets the structural parameter forwarded to the basis primitive.
    #[must_use]
    pub fn with_param(mut self, param: usize) -> Self {
        self.param = param;
        self
    }

    /// Returns the basis topology.
    #[must_use]
    pub const fn basis(&self) -> BasisKind {
        self.basis
    }

    /// Returns the basis width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the ordered motif list.
    #[must_use]
    pub fn shapes(&self) -> &[ShapeSpec] {
        &self.shapes
    }

    /// Returns the first node id.
    #[must_use]
    pub const fn start(&self) -> NodeId {
        self.start
    }

    /// Returns whether plug-ins are sampled at random.
    #[must_use]
    pub const fn random_plugins(&self) -> bool {
        self.random_plugins
    }

    /// Returns the number of extra random edges requested.
    #[must_use]
    pub const fn extra_random_edges(&self) -> usize {
        self.extra_random_edges
    }

    /// Returns the duplicate handling for extra random edges.
    #[must_use]
    pub const fn random_edge_policy(&self) -> RandomEdgePolicy {
        self.random_edge_policy
    }

    /// Returns the structural parameter forwarded to the basis.
    #[must_use]
    pub const fn param(&self) -> usize {
        self.param
    }
}
