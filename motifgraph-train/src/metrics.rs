//! Accuracy bookkeeping and run summaries.

use std::fmt;

use serde::Serialize;

/// Index of the largest entry in `row`, preferring the first on ties.
///
/// Returns `None` for an empty row.
#[must_use]
pub fn argmax(row: &[f64]) -> Option<usize> {
    row.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (index, &value)| match best {
            Some((_, top)) if value <= top => best,
            _ => Some((index, value)),
        })
        .map(|(index, _)| index)
}

/// Accuracy of a model that guesses uniformly among `num_classes` classes.
#[must_use]
pub fn random_guess(num_classes: usize) -> f64 {
    if num_classes == 0 {
        0.0
    } else {
        1.0 / num_classes as f64
    }
}

/// Fraction of correct predictions per head.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct HeadAccuracy {
    /// Accuracy of the combined head.
    pub combined: f64,
    /// Accuracy of the causal head.
    pub causal: f64,
    /// Accuracy of the object head.
    pub object: f64,
}

/// Correct-prediction counters accumulated over batches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct HeadCounts {
    pub(crate) combined: usize,
    pub(crate) causal: usize,
    pub(crate) object: usize,
}

impl HeadCounts {
    pub(crate) fn accuracy(self, samples: usize) -> HeadAccuracy {
        if samples == 0 {
            return HeadAccuracy::default();
        }
        let total = samples as f64;
        HeadAccuracy {
            combined: self.combined as f64 / total,
            causal: self.causal as f64 / total,
            object: self.object as f64 / total,
        }
    }
}

/// Counts rows whose arg-max matches the target.
pub(crate) fn count_correct(log_probs: &[Vec<f64>], targets: &[usize]) -> usize {
    log_probs
        .iter()
        .zip(targets)
        .filter(|&(row, &target)| argmax(row) == Some(target))
        .count()
}

/// Sample-weighted mean losses of one training epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EpochLoss {
    /// Weighted total loss.
    pub total: f64,
    /// Uniform KL on the causal head.
    pub causal: f64,
    /// Supervised loss on the object head.
    pub object: f64,
    /// Supervised loss on the combined head.
    pub combined: f64,
}

/// Everything measured during one epoch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EpochRecord {
    /// One-based epoch number.
    pub epoch: usize,
    /// Mean training losses.
    pub loss: EpochLoss,
    /// Object-head accuracy on the training samples.
    pub train_accuracy: f64,
    /// Validation accuracy, when a validation split exists.
    pub val: Option<HeadAccuracy>,
    /// Test accuracy.
    pub test: HeadAccuracy,
    /// Learning rate used for this epoch.
    pub learning_rate: f64,
}

/// Mean and population standard deviation of a set of measurements.
///
/// # Examples
/// ```
/// use motifgraph_train::MeanStd;
///
/// let summary = MeanStd::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
/// assert_eq!(summary.mean, 5.0);
/// assert_eq!(summary.std, 2.0);
/// assert_eq!(summary.to_string(), "5.00 ± 2.00");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MeanStd {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
}

impl MeanStd {
    /// Summarises `samples`; an empty slice yields zeros.
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;
        let variance = samples
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / count;
        Self {
            mean,
            std: variance.sqrt(),
        }
    }

    /// Returns the summary with both values multiplied by 100.
    #[must_use]
    pub fn as_percent(self) -> Self {
        Self {
            mean: self.mean * 100.0,
            std: self.std * 100.0,
        }
    }
}

impl fmt::Display for MeanStd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ± {:.2}", self.mean, self.std)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0.1, 0.7, 0.2], Some(1))]
    #[case(&[0.5, 0.5], Some(0))]
    #[case(&[], None)]
    fn argmax_prefers_the_first_maximum(#[case] row: &[f64], #[case] expected: Option<usize>) {
        assert_eq!(argmax(row), expected);
    }

    #[rstest]
    fn counts_become_fractions() {
        let counts = HeadCounts {
            combined: 3,
            causal: 1,
            object: 4,
        };
        let accuracy = counts.accuracy(4);
        assert_eq!(accuracy.combined, 0.75);
        assert_eq!(accuracy.causal, 0.25);
        assert_eq!(accuracy.object, 1.0);
        assert_eq!(counts.accuracy(0), HeadAccuracy::default());
    }

    #[rstest]
    fn correct_predictions_are_counted() {
        let rows = vec![vec![0.0, -1.0], vec![-3.0, -0.1], vec![-0.2, -2.0]];
        assert_eq!(count_correct(&rows, &[0, 1, 1]), 2);
    }

    #[rstest]
    #[case(4, 0.25)]
    #[case(0, 0.0)]
    fn random_guess_is_uniform(#[case] classes: usize, #[case] expected: f64) {
        assert_eq!(random_guess(classes), expected);
    }

    #[rstest]
    fn percent_scales_both_moments() {
        let summary = MeanStd::from_samples(&[0.5, 0.7]).as_percent();
        assert!((summary.mean - 60.0).abs() < 1e-9);
        assert!((summary.std - 10.0).abs() < 1e-9);
    }
}
