//! Cosine annealing of the learning rate.

use std::f64::consts::PI;

use crate::error::{Result, TrainError};

/// Learning rate that follows half a cosine from `base` down to `min`
/// over `period` epochs.
///
/// # Examples
/// ```
/// use motifgraph_train::CosineAnnealing;
///
/// let mut schedule = CosineAnnealing::new(0.1, 0.0, 4)?;
/// assert_eq!(schedule.current(), 0.1);
/// schedule.step();
/// schedule.step();
/// assert!((schedule.current() - 0.05).abs() < 1e-12);
/// # Ok::<(), motifgraph_train::TrainError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CosineAnnealing {
    base: f64,
    min: f64,
    period: usize,
    epoch: usize,
}

impl CosineAnnealing {
    /// Creates a schedule positioned at epoch zero.
    ///
    /// # Errors
    /// Returns [`TrainError::InvalidConfig`] when `period` is zero.
    pub fn new(base: f64, min: f64, period: usize) -> Result<Self> {
        if period == 0 {
            return Err(TrainError::invalid_config(
                "cosine schedule period must be positive",
            ));
        }
        Ok(Self {
            base,
            min,
            period,
            epoch: 0,
        })
    }

    /// Learning rate after `epoch` schedule steps.
    #[must_use]
    pub fn lr_at(&self, epoch: usize) -> f64 {
        let phase = PI * epoch as f64 / self.period as f64;
        self.min + (self.base - self.min) * (1.0 + phase.cos()) / 2.0
    }

    /// Learning rate for the current epoch.
    #[must_use]
    pub fn current(&self) -> f64 {
        self.lr_at(self.epoch)
    }

    /// Advances the schedule by one epoch.
    pub fn step(&mut self) {
        self.epoch += 1;
    }
}
