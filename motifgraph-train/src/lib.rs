//! Training harness for causal graph classifiers.
//!
//! The harness is model-agnostic: anything implementing [`CausalModel`]
//! can be trained on a [`LabeledDataset`], with the composite causal loss,
//! a cosine learning-rate schedule, stratified k-fold splitting and
//! best-epoch bookkeeping provided here.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod batch;
mod config;
mod dataset;
mod error;
mod folds;
mod harness;
pub mod loss;
mod metrics;
mod model;
mod schedule;

pub use crate::{
    batch::Batches,
    config::{EpochSelect, LossWeights, TrainConfig},
    dataset::{InMemoryDataset, LabeledDataset},
    error::{ModelError, Result, TrainError, TrainErrorCode},
    folds::{Fold, k_fold},
    harness::{
        CrossValidationReport, DataSplit, EpochTrainStats, FoldReport, SplitReport, Trainer,
    },
    loss::{CompositeLoss, NegativeLogLikelihood, SupervisedLoss},
    metrics::{EpochLoss, EpochRecord, HeadAccuracy, MeanStd, argmax, random_guess},
    model::{CausalLogits, CausalModel, ForwardMode, OptimizerStep},
    schedule::CosineAnnealing,
};
