//! Error types for the motifgraph core library.
//!
//! Defines the error enum exposed by the public API, its stable error codes,
//! and a convenient result alias.

use std::fmt;

use thiserror::Error;

/// Generates a stable code enum for an error type together with the
/// `as_str`, `Display` and `code()` plumbing.
///
/// Exported so sibling crates can give their own error enums the same
/// machine-readable surface.
#[macro_export]
macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::std::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing synthetic graphs.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// An edge joined a node to itself.
    #[error("self-loop on node {node} is not permitted in a simple graph")]
    SelfLoop {
        /// Node the rejected edge started and ended on.
        node: usize,
    },
    /// A primitive or assembler parameter was out of range.
    #[error("invalid value for `{parameter}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Human-readable explanation of the constraint.
        reason: String,
    },
    /// More edges were requested for removal than a clique holds.
    #[error("cannot remove {requested} edges from a clique with {available} edges")]
    TooManyRemovals {
        /// Number of edges the caller asked to remove.
        requested: usize,
        /// Number of edges in the complete graph.
        available: usize,
    },
    /// More motifs were requested than there are basis nodes to plug into.
    #[error("{shapes} motifs need distinct plug-ins but the basis only has {basis_nodes} nodes")]
    PluginsExceedBasis {
        /// Number of motifs requested.
        shapes: usize,
        /// Number of nodes in the basis graph.
        basis_nodes: usize,
    },
    /// The graph has no room for the requested number of new edges.
    #[error("requested {requested} new random edges but only {available} node pairs are free")]
    InsufficientNonEdges {
        /// Number of new edges requested.
        requested: usize,
        /// Number of unconnected node pairs left in the graph.
        available: usize,
    },
    /// A shape name did not match any known primitive.
    #[error("unknown shape `{name}`")]
    UnknownShape {
        /// Name supplied by the caller.
        name: String,
    },
    /// A basis name did not match any known topology.
    #[error("unknown basis `{name}`; expected one of clique, cycle, tree, ba, grid")]
    UnknownBasis {
        /// Name supplied by the caller.
        name: String,
    },
    /// A shape specification string had malformed parameters.
    #[error("invalid shape specification `{spec}`: {reason}")]
    InvalidShapeSpec {
        /// Raw specification supplied by the caller.
        spec: String,
        /// Why the parameters were rejected.
        reason: String,
    },
}

crate::define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// An edge joined a node to itself.
        SelfLoop => SelfLoop { .. } => "GRAPH_SELF_LOOP",
        /// A primitive or assembler parameter was out of range.
        InvalidParameter => InvalidParameter { .. } => "GRAPH_INVALID_PARAMETER",
        /// More edges were requested for removal than a clique holds.
        TooManyRemovals => TooManyRemovals { .. } => "GRAPH_TOO_MANY_REMOVALS",
        /// More motifs were requested than there are basis nodes.
        PluginsExceedBasis => PluginsExceedBasis { .. } => "GRAPH_PLUGINS_EXCEED_BASIS",
        /// The graph has no room for the requested new edges.
        InsufficientNonEdges => InsufficientNonEdges { .. } => "GRAPH_INSUFFICIENT_NON_EDGES",
        /// A shape name did not match any known primitive.
        UnknownShape => UnknownShape { .. } => "GRAPH_UNKNOWN_SHAPE",
        /// A basis name did not match any known topology.
        UnknownBasis => UnknownBasis { .. } => "GRAPH_UNKNOWN_BASIS",
        /// A shape specification string had malformed parameters.
        InvalidShapeSpec => InvalidShapeSpec { .. } => "GRAPH_INVALID_SHAPE_SPEC",
    }
}

impl GraphError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl fmt::Display) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.to_string(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GraphError>;
