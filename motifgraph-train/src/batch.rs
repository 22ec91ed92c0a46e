//! Splitting sample indices into mini-batches.

use rand::{Rng, seq::SliceRandom};

use crate::error::{Result, TrainError};

/// Ordered mini-batches of sample indices.
///
/// # Examples
/// ```
/// use motifgraph_train::Batches;
///
/// let batches = Batches::sequential(&[4, 5, 6, 7, 8], 2)?;
/// let sizes: Vec<_> = batches.iter().map(<[usize]>::len).collect();
/// assert_eq!(sizes, vec![2, 2, 1]);
/// # Ok::<(), motifgraph_train::TrainError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batches {
    batches: Vec<Vec<usize>>,
}

impl Batches {
    /// Chunks `indices` in their given order. The last batch may be short.
    ///
    /// # Errors
    /// Returns [`TrainError::InvalidConfig`] when `batch_size` is zero.
    pub fn sequential(indices: &[usize], batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(TrainError::invalid_config("`batch_size` must be positive"));
        }
        Ok(Self {
            batches: indices.chunks(batch_size).map(<[usize]>::to_vec).collect(),
        })
    }

    /// Shuffles a copy of `indices` with `rng` before chunking.
    ///
    /// # Errors
    /// Returns [`TrainError::InvalidConfig`] when `batch_size` is zero.
    pub fn shuffled<R: Rng + ?Sized>(
        indices: &[usize],
        batch_size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let mut order = indices.to_vec();
        order.shuffle(rng);
        Self::sequential(&order, batch_size)
    }

    /// Iterates over the batches in order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.batches.iter().map(Vec::as_slice)
    }

    /// Number of batches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Whether there are no batches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
