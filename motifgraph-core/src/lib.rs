//! Synthetic motif graph core library.
//!
//! Builds labelled graphs by grafting small structural motifs (houses,
//! diamonds, cycles, ...) onto a large basis topology. Every node carries a
//! role label so graph explainers can be scored against ground truth.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod assembler;
mod config;
pub mod encode;
mod error;
mod graph;
pub mod shapes;

pub use crate::{
    assembler::{MotifPlacement, SyntheticGraph, build_graph},
    config::{BasisKind, BuildConfig, RandomEdgePolicy},
    encode::{EncodedGraph, FeatureDim},
    error::{GraphError, GraphErrorCode, Result},
    graph::{Edge, Graph, NodeId},
    shapes::{LabeledGraph, RoleId, ShapeKind, ShapeSpec},
};
