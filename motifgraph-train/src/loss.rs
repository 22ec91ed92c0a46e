//! Loss terms of the causal objective.
//!
//! The objective is `c·KL(u ‖ causal) + o·L(object, y) + co·L(combined, y)`
//! where `u` is the uniform distribution over classes and `L` is a
//! [`SupervisedLoss`].

use crate::{
    config::LossWeights,
    error::{Result, TrainError},
};

/// KL divergence from the uniform distribution to each row of `log_probs`,
/// averaged over rows.
///
/// Returns zero for an empty batch.
///
/// # Examples
/// ```
/// use motifgraph_train::loss::uniform_kl;
///
/// let uniform = vec![vec![0.25_f64.ln(); 4]; 3];
/// assert!(uniform_kl(&uniform).abs() < 1e-12);
/// ```
#[must_use]
pub fn uniform_kl(log_probs: &[Vec<f64>]) -> f64 {
    if log_probs.is_empty() {
        return 0.0;
    }
    let total: f64 = log_probs
        .iter()
        .map(|row| {
            if row.is_empty() {
                return 0.0;
            }
            let mass = 1.0 / row.len() as f64;
            let log_mass = mass.ln();
            row.iter().map(|&lp| mass * (log_mass - lp)).sum::<f64>()
        })
        .sum();
    total / log_probs.len() as f64
}

/// Supervised loss over log-probabilities and integer targets.
pub trait SupervisedLoss {
    /// Returns the mean loss of `log_probs` against `targets`.
    ///
    /// # Errors
    /// Returns [`TrainError::LabelOutOfRange`] when a target has no column,
    /// or [`TrainError::LogitShape`] when the row count differs from the
    /// target count.
    fn loss(&self, log_probs: &[Vec<f64>], targets: &[usize]) -> Result<f64>;
}

/// Mean negative log-likelihood of the target classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NegativeLogLikelihood;

impl SupervisedLoss for NegativeLogLikelihood {
    fn loss(&self, log_probs: &[Vec<f64>], targets: &[usize]) -> Result<f64> {
        if log_probs.len() != targets.len() {
            return Err(TrainError::LogitShape {
                head: "supervised",
                rows: log_probs.len(),
                cols: log_probs.first().map_or(0, Vec::len),
                expected_rows: targets.len(),
                expected_cols: log_probs.first().map_or(0, Vec::len),
            });
        }
        if targets.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for (index, (row, &target)) in log_probs.iter().zip(targets).enumerate() {
            let lp = row.get(target).ok_or(TrainError::LabelOutOfRange {
                index,
                label: target,
                num_classes: row.len(),
            })?;
            total -= lp;
        }
        Ok(total / targets.len() as f64)
    }
}

/// The three weighted loss terms of one batch and their sum.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompositeLoss {
    /// Uniform KL on the causal head.
    pub causal: f64,
    /// Supervised loss on the object head.
    pub object: f64,
    /// Supervised loss on the combined head.
    pub combined: f64,
    /// `c·causal + o·object + co·combined`.
    pub total: f64,
}

impl CompositeLoss {
    /// Combines the unweighted terms with `weights`.
    #[must_use]
    pub fn new(weights: LossWeights, causal: f64, object: f64, combined: f64) -> Self {
        Self {
            causal,
            object,
            combined,
            total: weights.c * causal + weights.o * object + weights.co * combined,
        }
    }

    /// Computes all three terms for a batch of head outputs.
    ///
    /// # Errors
    /// Propagates failures from `supervised`.
    pub fn compute<L: SupervisedLoss + ?Sized>(
        weights: LossWeights,
        supervised: &L,
        causal: &[Vec<f64>],
        object: &[Vec<f64>],
        combined: &[Vec<f64>],
        targets: &[usize],
    ) -> Result<Self> {
        Ok(Self::new(
            weights,
            uniform_kl(causal),
            supervised.loss(object, targets)?,
            supervised.loss(combined, targets)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[rstest]
    fn kl_of_a_peaked_row_is_positive() {
        let peaked = vec![vec![0.97_f64.ln(), 0.01_f64.ln(), 0.02_f64.ln()]];
        assert!(uniform_kl(&peaked) > 0.5);
        assert!(approx(uniform_kl(&[]), 0.0));
    }

    #[rstest]
    fn kl_is_averaged_over_the_batch() {
        let peaked = vec![0.9_f64.ln(), 0.1_f64.ln()];
        let uniform = vec![0.5_f64.ln(); 2];
        let single = uniform_kl(std::slice::from_ref(&peaked));
        let mixed = uniform_kl(&[peaked, uniform]);
        assert!(approx(mixed, single / 2.0));
    }

    #[rstest]
    fn nll_picks_target_columns() {
        let rows = vec![vec![0.5_f64.ln(), 0.5_f64.ln()], vec![1e-3_f64.ln(), 0.0]];
        let loss = NegativeLogLikelihood
            .loss(&rows, &[0, 1])
            .expect("valid targets");
        assert!(approx(loss, -(0.5_f64.ln()) / 2.0));
    }

    #[rstest]
    fn nll_rejects_targets_without_a_column() {
        let rows = vec![vec![0.0]];
        let err = NegativeLogLikelihood
            .loss(&rows, &[1])
            .expect_err("target 1 has no column");
        assert!(matches!(err, TrainError::LabelOutOfRange { label: 1, .. }));
    }

    #[rstest]
    fn composite_total_applies_weights() {
        let weights = LossWeights {
            c: 0.5,
            o: 2.0,
            co: 0.25,
        };
        let loss = CompositeLoss::new(weights, 1.0, 3.0, 4.0);
        assert!(approx(loss.total, 0.5 + 6.0 + 1.0));
    }

    fn distribution(len: usize) -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.01_f64..1.0, len).prop_map(|weights| {
            let sum: f64 = weights.iter().sum();
            weights.into_iter().map(|w| (w / sum).ln()).collect()
        })
    }

    proptest! {
        #[test]
        fn kl_is_never_negative(rows in (2_usize..6).prop_flat_map(|k| {
            prop::collection::vec(distribution(k), 1..8)
        })) {
            prop_assert!(uniform_kl(&rows) >= -1e-12);
        }
    }
}
