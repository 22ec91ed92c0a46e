//! Benchmark support crate for motifgraph.
//!
//! Provides workload builders and parameter types used by the Criterion
//! benchmarks for graph assembly and cross-validation fold splitting.

pub mod error;
pub mod params;
pub mod workload;
