//! Typed motif descriptors and their compact string form.

use std::{fmt, str::FromStr};

use rand::Rng;

use super::{LabeledGraph, RoleId, primitives};
use crate::{
    error::{GraphError, Result},
    graph::NodeId,
};

const DEFAULT_GRID_ROWS: usize = 3;
const DEFAULT_GRID_COLS: usize = 2;
const DEFAULT_TREE_BRANCHING: usize = 10;
const DEFAULT_BA_ATTACH: usize = 5;

/// Parameter-free kind of a motif.
///
/// Motifs of the same kind share one block of role labels inside a single
/// assembled graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ShapeKind {
    /// Five-node house.
    House,
    /// Six-node ring with two chords.
    Diamond,
    /// Simple ring.
    Cycle,
    /// Complete graph, optionally with edges removed.
    Clique,
    /// Rectangular lattice.
    Grid,
    /// Balanced tree.
    Tree,
    /// Barabási–Albert random graph.
    Ba,
}

impl ShapeKind {
    /// Returns the name used in shape specification strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Diamond => "diamond",
            Self::Cycle => "cycle",
            Self::Clique => "clique",
            Self::Grid => "grid",
            Self::Tree => "tree",
            Self::Ba => "ba",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A motif together with the parameters needed to instantiate it.
///
/// The string form is `name[:param[:param]]`, for example `house`,
/// `cycle:6`, `clique:5:2`, `grid:3x2`, `tree:2:3` or `ba:20:3`.
///
/// # Examples
/// ```
/// use motifgraph_core::shapes::{ShapeKind, ShapeSpec};
///
/// let spec: ShapeSpec = "cycle:6".parse()?;
/// assert_eq!(spec, ShapeSpec::Cycle { length: 6 });
/// assert_eq!(spec.kind(), ShapeKind::Cycle);
/// assert_eq!(spec.to_string(), "cycle:6");
/// # Ok::<(), motifgraph_core::GraphError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeSpec {
    /// Five-node house with three roles.
    House,
    /// Six-node diamond.
    Diamond,
    /// Ring of `length` nodes.
    Cycle {
        /// Number of nodes in the ring.
        length: usize,
    },
    /// Complete graph with `remove` random edges stripped.
    Clique {
        /// Number of nodes.
        nodes: usize,
        /// Number of edges removed at random.
        remove: usize,
    },
    /// `rows x cols` lattice.
    Grid {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
    /// Balanced tree.
    Tree {
        /// Depth below the root.
        height: usize,
        /// Children per internal node.
        branching: usize,
    },
    /// Barabási–Albert graph.
    Ba {
        /// Number of nodes.
        width: usize,
        /// Edges added per new node.
        attach: usize,
    },
}

impl ShapeSpec {
    /// Returns the default `3 x 2` grid motif.
    #[must_use]
    pub const fn default_grid() -> Self {
        Self::Grid {
            rows: DEFAULT_GRID_ROWS,
            cols: DEFAULT_GRID_COLS,
        }
    }

    /// Returns the kind used to share role-label blocks.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::House => ShapeKind::House,
            Self::Diamond => ShapeKind::Diamond,
            Self::Cycle { .. } => ShapeKind::Cycle,
            Self::Clique { .. } => ShapeKind::Clique,
            Self::Grid { .. } => ShapeKind::Grid,
            Self::Tree { .. } => ShapeKind::Tree,
            Self::Ba { .. } => ShapeKind::Ba,
        }
    }

    /// Builds the motif with node ids starting at `start`.
    ///
    /// # Errors
    /// Propagates the [`GraphError`] raised by the underlying primitive.
    pub fn instantiate<R: Rng + ?Sized>(
        &self,
        start: NodeId,
        role_start: RoleId,
        rng: &mut R,
    ) -> Result<LabeledGraph> {
        match *self {
            Self::House => primitives::house(start, role_start),
            Self::Diamond => primitives::diamond(start, role_start),
            Self::Cycle { length } => primitives::cycle(start, length, role_start),
            Self::Clique { nodes, remove } => {
                primitives::clique(start, nodes, remove, role_start, rng)
            }
            Self::Grid { rows, cols } => primitives::grid(start, rows, cols, role_start),
            Self::Tree { height, branching } => {
                primitives::tree(start, height, branching, role_start)
            }
            Self::Ba { width, attach } => primitives::ba(start, width, attach, role_start, rng),
        }
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::House | Self::Diamond => f.write_str(self.kind().as_str()),
            Self::Cycle { length } => write!(f, "cycle:{length}"),
            Self::Clique { nodes, remove } => write!(f, "clique:{nodes}:{remove}"),
            Self::Grid { rows, cols } => write!(f, "grid:{rows}x{cols}"),
            Self::Tree { height, branching } => write!(f, "tree:{height}:{branching}"),
            Self::Ba { width, attach } => write!(f, "ba:{width}:{attach}"),
        }
    }
}

impl FromStr for ShapeSpec {
    type Err = GraphError;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let mut parts = trimmed.split(':');
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let params: Vec<&str> = parts.collect();
        let parser = ParamParser {
            spec: trimmed,
            params: &params,
        };

        match name.as_str() {
            "house" => parser.expect_at_most(0).map(|()| Self::House),
            "diamond" => parser.expect_at_most(0).map(|()| Self::Diamond),
            "cycle" => {
                parser.expect_at_most(1)?;
                Ok(Self::Cycle {
                    length: parser.required(0, "length")?,
                })
            }
            "clique" => {
                parser.expect_at_most(2)?;
                Ok(Self::Clique {
                    nodes: parser.required(0, "nodes")?,
                    remove: parser.optional(1, "remove", 0)?,
                })
            }
            "grid" => {
                parser.expect_at_most(1)?;
                parser.params.first().map_or(Ok(Self::default_grid()), |dims| {
                    parser.grid_dimensions(dims)
                })
            }
            "tree" => {
                parser.expect_at_most(2)?;
                Ok(Self::Tree {
                    height: parser.required(0, "height")?,
                    branching: parser.optional(1, "branching", DEFAULT_TREE_BRANCHING)?,
                })
            }
            "ba" => {
                parser.expect_at_most(2)?;
                Ok(Self::Ba {
                    width: parser.required(0, "width")?,
                    attach: parser.optional(1, "attach", DEFAULT_BA_ATTACH)?,
                })
            }
            _ => Err(GraphError::UnknownShape { name }),
        }
    }
}

struct ParamParser<'a> {
    spec: &'a str,
    params: &'a [&'a str],
}

impl ParamParser<'_> {
    fn reject(&self, reason: impl Into<String>) -> GraphError {
        GraphError::InvalidShapeSpec {
            spec: self.spec.to_owned(),
            reason: reason.into(),
        }
    }

    fn expect_at_most(&self, count: usize) -> Result<()> {
        if self.params.len() > count {
            return Err(self.reject(format!(
                "expected at most {count} parameters, found {}",
                self.params.len()
            )));
        }
        Ok(())
    }

    fn parse(&self, raw: &str, what: &str) -> Result<usize> {
        raw.trim()
            .parse::<usize>()
            .map_err(|err| self.reject(format!("`{what}` must be a non-negative integer: {err}")))
    }

    fn required(&self, index: usize, what: &str) -> Result<usize> {
        let raw = self
            .params
            .get(index)
            .ok_or_else(|| self.reject(format!("missing `{what}`")))?;
        self.parse(raw, what)
    }

    fn optional(&self, index: usize, what: &str, default: usize) -> Result<usize> {
        self.params
            .get(index)
            .map_or(Ok(default), |raw| self.parse(raw, what))
    }

    fn grid_dimensions(&self, dims: &str) -> Result<ShapeSpec> {
        let (rows, cols) = dims
            .split_once(['x', 'X'])
            .ok_or_else(|| self.reject("grid dimensions must look like `ROWSxCOLS`"))?;
        Ok(ShapeSpec::Grid {
            rows: self.parse(rows, "rows")?,
            cols: self.parse(cols, "cols")?,
        })
    }
}
