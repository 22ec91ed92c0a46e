//! Benchmark setup error type.
//!
//! Lets setup helpers propagate failures with `?` instead of `.expect()`.

use motifgraph_core::GraphError;
use motifgraph_train::TrainError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Graph assembly failed.
    #[error("graph assembly failed: {0}")]
    Graph(#[from] GraphError),
    /// Dataset or fold preparation failed.
    #[error("training setup failed: {0}")]
    Train(#[from] TrainError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
