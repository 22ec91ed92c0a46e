//! Hyper-parameters for the training harness.
//!
//! [`TrainConfig`] is assembled with `with_*` setters or deserialised from
//! JSON, then checked with [`TrainConfig::validate`] before a run starts.

use std::{fmt, str::FromStr};

use motifgraph_core::FeatureDim;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainError};

/// Which split decides the validation fold in [`crate::k_fold`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpochSelect {
    /// Validate on the test fold itself.
    #[default]
    TestMax,
    /// Validate on the fold preceding the test fold.
    ValMax,
}

impl EpochSelect {
    /// Returns the name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TestMax => "test_max",
            Self::ValMax => "val_max",
        }
    }
}

impl fmt::Display for EpochSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EpochSelect {
    type Err = TrainError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "test_max" => Ok(Self::TestMax),
            "val_max" => Ok(Self::ValMax),
            other => Err(TrainError::invalid_config(format!(
                "unknown epoch selection `{other}`"
            ))),
        }
    }
}

/// Weights of the three terms of the composite causal loss.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LossWeights {
    /// Weight of the uniform KL term on the causal head.
    pub c: f64,
    /// Weight of the supervised loss on the object head.
    pub o: f64,
    /// Weight of the supervised loss on the combined head.
    pub co: f64,
}

impl Default for LossWeights {
    fn default() -> Self {
        Self {
            c: 0.5,
            o: 1.0,
            co: 0.5,
        }
    }
}

/// Options controlling a training run.
///
/// # Examples
/// ```
/// use motifgraph_train::{EpochSelect, TrainConfig};
///
/// let config = TrainConfig::default()
///     .with_epochs(20)
///     .with_batch_size(32)
///     .with_folds(5)
///     .with_epoch_select(EpochSelect::ValMax);
/// config.validate()?;
/// assert_eq!(config.epochs(), 20);
///
/// let parsed: TrainConfig = serde_json::from_str(r#"{"lr": 0.01, "folds": 3}"#)
///     .expect("valid JSON");
/// assert_eq!(parsed.folds(), 3);
/// assert_eq!(parsed.batch_size(), TrainConfig::default().batch_size());
/// # Ok::<(), motifgraph_train::TrainError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    lr: f64,
    min_lr: f64,
    epochs: usize,
    batch_size: usize,
    weight_decay: f64,
    c: f64,
    o: f64,
    co: f64,
    folds: usize,
    epoch_select: EpochSelect,
    eval_random: bool,
    feature_dim: FeatureDim,
    max_degree: usize,
    seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        let weights = LossWeights::default();
        Self {
            lr: 1e-3,
            min_lr: 1e-6,
            epochs: 100,
            batch_size: 128,
            weight_decay: 0.0,
            c: weights.c,
            o: weights.o,
            co: weights.co,
            folds: 10,
            epoch_select: EpochSelect::TestMax,
            eval_random: false,
            feature_dim: FeatureDim::Auto,
            max_degree: 0,
            seed: 1,
        }
    }
}

impl TrainConfig {
    /// Checks every option against its valid range.
    ///
    /// # Errors
    /// Returns [`TrainError::InvalidConfig`] naming the first offending
    /// option.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TrainError::invalid_config(format!(
                    "`{name}` must be a positive finite number, got {value}"
                )))
            }
        };
        let non_negative = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TrainError::invalid_config(format!(
                    "`{name}` must be a non-negative finite number, got {value}"
                )))
            }
        };

        positive("lr", self.lr)?;
        non_negative("min_lr", self.min_lr)?;
        if self.min_lr > self.lr {
            return Err(TrainError::invalid_config(format!(
                "`min_lr` ({}) must not exceed `lr` ({})",
                self.min_lr, self.lr
            )));
        }
        non_negative("weight_decay", self.weight_decay)?;
        non_negative("c", self.c)?;
        non_negative("o", self.o)?;
        non_negative("co", self.co)?;
        if self.epochs == 0 {
            return Err(TrainError::invalid_config("`epochs` must be positive"));
        }
        if self.batch_size == 0 {
            return Err(TrainError::invalid_config("`batch_size` must be positive"));
        }
        if self.folds < 2 {
            return Err(TrainError::invalid_config(format!(
                "`folds` must be at least 2, got {}",
                self.folds
            )));
        }
        if self.feature_dim == FeatureDim::Fixed(0) {
            return Err(TrainError::invalid_config(
                "a fixed `feature_dim` must be positive",
            ));
        }
        Ok(())
    }

    /// Resolves the input width handed to the model factory.
    ///
    /// [`FeatureDim::Auto`] uses `max_degree`, falling back to
    /// `dataset_features` when no maximum degree was configured.
    #[must_use]
    pub const fn resolve_feature_dim(&self, dataset_features: usize) -> usize {
        match self.feature_dim {
            FeatureDim::Fixed(dim) => dim,
            FeatureDim::Auto if self.max_degree > 0 => self.max_degree,
            FeatureDim::Auto => dataset_features,
        }
    }

    /// Sets the initial learning rate.
    #[must_use]
    pub fn with_lr(mut self, lr: f64) -> Self {
        self.lr = lr;
        self
    }

    /// Sets the floor of the cosine schedule.
    #[must_use]
    pub fn with_min_lr(mut self, min_lr: f64) -> Self {
        self.min_lr = min_lr;
        self
    }

    /// Sets the number of epochs per run or fold.
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the number of samples per batch.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the L2 penalty passed to the optimizer.
    #[must_use]
    pub fn with_weight_decay(mut self, weight_decay: f64) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    /// Sets all three loss weights.
    #[must_use]
    pub fn with_loss_weights(mut self, weights: LossWeights) -> Self {
        self.c = weights.c;
        self.o = weights.o;
        self.co = weights.co;
        self
    }

    /// Sets the number of cross-validation folds.
    #[must_use]
    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    /// Sets how validation folds are chosen.
    #[must_use]
    pub fn with_epoch_select(mut self, epoch_select: EpochSelect) -> Self {
        self.epoch_select = epoch_select;
        self
    }

    /// Enables randomised evaluation in the model's forward pass.
    #[must_use]
    pub fn with_eval_random(mut self, eval_random: bool) -> Self {
        self.eval_random = eval_random;
        self
    }

    /// Sets the model input width.
    #[must_use]
    pub fn with_feature_dim(mut self, feature_dim: FeatureDim) -> Self {
        self.feature_dim = feature_dim;
        self
    }

    /// Sets the maximum degree used when the feature width is automatic.
    #[must_use]
    pub fn with_max_degree(mut self, max_degree: usize) -> Self {
        self.max_degree = max_degree;
        self
    }

    /// Sets the seed for shuffling and fold assignment.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the initial learning rate.
    #[must_use]
    pub const fn lr(&self) -> f64 {
        self.lr
    }

    /// Returns the floor of the cosine schedule.
    #[must_use]
    pub const fn min_lr(&self) -> f64 {
        self.min_lr
    }

    /// Returns the number of epochs.
    #[must_use]
    pub const fn epochs(&self) -> usize {
        self.epochs
    }

    /// Returns the batch size.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the weight decay.
    #[must_use]
    pub const fn weight_decay(&self) -> f64 {
        self.weight_decay
    }

    /// Returns the loss weights.
    #[must_use]
    pub const fn loss_weights(&self) -> LossWeights {
        LossWeights {
            c: self.c,
            o: self.o,
            co: self.co,
        }
    }

    /// Returns the number of folds.
    #[must_use]
    pub const fn folds(&self) -> usize {
        self.folds
    }

    /// Returns the validation fold policy.
    #[must_use]
    pub const fn epoch_select(&self) -> EpochSelect {
        self.epoch_select
    }

    /// Returns whether evaluation is randomised.
    #[must_use]
    pub const fn eval_random(&self) -> bool {
        self.eval_random
    }

    /// Returns the configured feature width.
    #[must_use]
    pub const fn feature_dim(&self) -> FeatureDim {
        self.feature_dim
    }

    /// Returns the configured maximum degree.
    #[must_use]
    pub const fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Returns the seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrainErrorCode;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_valid() {
        TrainConfig::default()
            .validate()
            .expect("defaults must validate");
    }

    #[rstest]
    #[case::zero_lr(TrainConfig::default().with_lr(0.0))]
    #[case::nan_lr(TrainConfig::default().with_lr(f64::NAN))]
    #[case::floor_above_lr(TrainConfig::default().with_lr(0.01).with_min_lr(0.1))]
    #[case::negative_decay(TrainConfig::default().with_weight_decay(-1.0))]
    #[case::no_epochs(TrainConfig::default().with_epochs(0))]
    #[case::no_batch(TrainConfig::default().with_batch_size(0))]
    #[case::one_fold(TrainConfig::default().with_folds(1))]
    #[case::negative_weight(TrainConfig::default().with_loss_weights(LossWeights {
        c: -0.5,
        o: 1.0,
        co: 1.0,
    }))]
    #[case::empty_features(TrainConfig::default().with_feature_dim(FeatureDim::Fixed(0)))]
    fn invalid_options_are_rejected(#[case] config: TrainConfig) {
        let err = config.validate().expect_err("config must be rejected");
        assert_eq!(err.code(), TrainErrorCode::InvalidConfig);
    }

    #[rstest]
    #[case(FeatureDim::Fixed(7), 12, 3, 7)]
    #[case(FeatureDim::Auto, 12, 3, 12)]
    #[case(FeatureDim::Auto, 0, 3, 3)]
    fn feature_dim_resolution(
        #[case] dim: FeatureDim,
        #[case] max_degree: usize,
        #[case] dataset: usize,
        #[case] expected: usize,
    ) {
        let config = TrainConfig::default()
            .with_feature_dim(dim)
            .with_max_degree(max_degree);
        assert_eq!(config.resolve_feature_dim(dataset), expected);
    }

    #[rstest]
    fn json_fills_missing_fields_with_defaults() {
        let config: TrainConfig = serde_json::from_str(
            r#"{"epochs": 3, "epoch_select": "val_max", "feature_dim": {"fixed": 4}}"#,
        )
        .expect("valid JSON");
        assert_eq!(config.epochs(), 3);
        assert_eq!(config.epoch_select(), EpochSelect::ValMax);
        assert_eq!(config.feature_dim(), FeatureDim::Fixed(4));
        assert_eq!(config.loss_weights(), LossWeights::default());
    }

    #[rstest]
    fn json_rejects_unknown_fields() {
        let parsed = serde_json::from_str::<TrainConfig>(r#"{"learning_rate": 0.1}"#);
        assert!(parsed.is_err());
    }

    #[rstest]
    #[case("test_max", EpochSelect::TestMax)]
    #[case("VAL-MAX", EpochSelect::ValMax)]
    fn epoch_select_parses(#[case] raw: &str, #[case] expected: EpochSelect) {
        assert_eq!(raw.parse::<EpochSelect>().expect("known name"), expected);
    }
}
