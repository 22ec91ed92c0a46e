//! The seam between the harness and a trainable causal model.

use crate::{dataset::LabeledDataset, error::ModelError, loss::CompositeLoss};

/// Whether a forward pass is part of training or evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardMode {
    /// Training pass; the model may keep state for the next [`CausalModel::step`].
    Train,
    /// Inference pass without gradient tracking.
    Eval {
        /// Randomise the causal/object pairing during evaluation.
        eval_random: bool,
    },
}

/// Log-probabilities from the three heads of a causal model.
///
/// Each head holds one row per sample in the batch and one column per class.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CausalLogits {
    /// Head fed only by the causal subgraph representation.
    pub causal: Vec<Vec<f64>>,
    /// Head fed only by the non-causal (object) representation.
    pub object: Vec<Vec<f64>>,
    /// Head fed by both representations.
    pub combined: Vec<Vec<f64>>,
}

impl CausalLogits {
    pub(crate) fn heads(&self) -> [(&'static str, &[Vec<f64>]); 3] {
        [
            ("causal", self.causal.as_slice()),
            ("object", self.object.as_slice()),
            ("combined", self.combined.as_slice()),
        ]
    }
}

/// Optimizer settings for one parameter update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptimizerStep {
    /// Learning rate for this update.
    pub learning_rate: f64,
    /// L2 penalty applied to the parameters.
    pub weight_decay: f64,
}

/// A model with causal, object and combined classification heads.
///
/// Implementations own their parameters and optimizer state. The harness
/// calls [`CausalModel::forward`] in [`ForwardMode::Train`] and then
/// [`CausalModel::step`] with the loss of that batch.
pub trait CausalModel<D: LabeledDataset + ?Sized> {
    /// Number of classes each head predicts.
    fn num_classes(&self) -> usize;

    /// Runs the model on the samples `batch` of `dataset`.
    ///
    /// # Errors
    /// Returns [`ModelError`] when the model cannot evaluate the batch.
    fn forward(
        &mut self,
        dataset: &D,
        batch: &[usize],
        mode: ForwardMode,
    ) -> Result<CausalLogits, ModelError>;

    /// Back-propagates `loss` from the latest training forward pass and
    /// updates the parameters.
    ///
    /// # Errors
    /// Returns [`ModelError`] when the update fails.
    fn step(&mut self, loss: &CompositeLoss, optimizer: &OptimizerStep) -> Result<(), ModelError>;
}
