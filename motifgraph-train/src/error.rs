//! Error types for the training harness.

use std::error::Error as StdError;

use thiserror::Error;

/// Failure reported by a [`crate::CausalModel`] implementation.
///
/// # Examples
/// ```
/// use motifgraph_train::ModelError;
///
/// let err = ModelError::new("device lost");
/// assert_eq!(err.to_string(), "device lost");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ModelError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ModelError {
    /// Creates an error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error that wraps an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Error type produced by the training harness.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TrainError {
    /// A configuration value was outside its valid range.
    #[error("invalid training configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },
    /// The dataset contained no samples.
    #[error("dataset `{dataset}` contains no samples")]
    EmptyDataset {
        /// Name of the empty dataset.
        dataset: String,
    },
    /// A split referenced a sample outside the dataset.
    #[error("sample index {index} is out of bounds for a dataset of {len} samples")]
    IndexOutOfBounds {
        /// Offending index.
        index: usize,
        /// Number of samples in the dataset.
        len: usize,
    },
    /// A model head returned logits of the wrong shape.
    #[error(
        "{head} logits have shape {rows}x{cols} but {expected_rows}x{expected_cols} was expected"
    )]
    LogitShape {
        /// Name of the head (`causal`, `object` or `combined`).
        head: &'static str,
        /// Rows returned.
        rows: usize,
        /// Columns returned in the first mismatching row.
        cols: usize,
        /// Rows expected (batch size).
        expected_rows: usize,
        /// Columns expected (class count).
        expected_cols: usize,
    },
    /// A sample label exceeded the declared number of classes.
    #[error("label {label} of sample {index} is not below the class count {num_classes}")]
    LabelOutOfRange {
        /// Sample index.
        index: usize,
        /// Offending label.
        label: usize,
        /// Declared number of classes.
        num_classes: usize,
    },
    /// The model failed during a forward pass or optimizer step.
    #[error("model failure: {source}")]
    Model {
        /// Error raised by the model.
        #[source]
        source: ModelError,
    },
}

motifgraph_core::define_error_codes! {
    /// Stable codes describing [`TrainError`] variants.
    enum TrainErrorCode for TrainError {
        /// A configuration value was outside its valid range.
        InvalidConfig => InvalidConfig { .. } => "TRAIN_INVALID_CONFIG",
        /// The dataset contained no samples.
        EmptyDataset => EmptyDataset { .. } => "TRAIN_EMPTY_DATASET",
        /// A split referenced a sample outside the dataset.
        IndexOutOfBounds => IndexOutOfBounds { .. } => "TRAIN_INDEX_OUT_OF_BOUNDS",
        /// A model head returned logits of the wrong shape.
        LogitShape => LogitShape { .. } => "TRAIN_LOGIT_SHAPE",
        /// A sample label exceeded the declared number of classes.
        LabelOutOfRange => LabelOutOfRange { .. } => "TRAIN_LABEL_OUT_OF_RANGE",
        /// The model failed during a forward pass or optimizer step.
        Model => Model { .. } => "TRAIN_MODEL_FAILURE",
    }
}

impl From<ModelError> for TrainError {
    fn from(source: ModelError) -> Self {
        Self::Model { source }
    }
}

impl TrainError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Convenient alias for results returned by the harness.
pub type Result<T> = core::result::Result<T, TrainError>;
