//! Labelled sample collections consumed by the harness.

use motifgraph_core::EncodedGraph;

use crate::error::{Result, TrainError};

/// Indexable collection of samples with integer class labels.
///
/// The harness only addresses samples by index; turning a batch of indices
/// into tensors is left to the [`crate::CausalModel`].
pub trait LabeledDataset {
    /// Number of samples.
    fn len(&self) -> usize;

    /// Whether the dataset holds no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable dataset name used in logs and errors.
    fn name(&self) -> &str;

    /// Number of target classes.
    fn num_classes(&self) -> usize;

    /// Width of each sample's node feature vector.
    fn num_features(&self) -> usize;

    /// Returns the class label of sample `index`.
    ///
    /// # Errors
    /// Returns [`TrainError::IndexOutOfBounds`] when `index >= len()`.
    fn label(&self, index: usize) -> Result<usize>;
}

/// Samples held in memory alongside their labels.
///
/// # Examples
/// ```
/// use motifgraph_train::{InMemoryDataset, LabeledDataset};
///
/// let data = InMemoryDataset::new("toy", vec!['a', 'b', 'c'], vec![0, 1, 0], 2, 4)?;
/// assert_eq!(data.len(), 3);
/// assert_eq!(data.label(1)?, 1);
/// # Ok::<(), motifgraph_train::TrainError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InMemoryDataset<T> {
    name: String,
    samples: Vec<T>,
    labels: Vec<usize>,
    num_classes: usize,
    num_features: usize,
}

impl<T> InMemoryDataset<T> {
    /// Creates a dataset from parallel sample and label vectors.
    ///
    /// # Errors
    /// Returns [`TrainError::InvalidConfig`] when the vectors differ in
    /// length or `num_classes` is zero, and
    /// [`TrainError::LabelOutOfRange`] when a label is not below
    /// `num_classes`.
    pub fn new(
        name: impl Into<String>,
        samples: Vec<T>,
        labels: Vec<usize>,
        num_classes: usize,
        num_features: usize,
    ) -> Result<Self> {
        if samples.len() != labels.len() {
            return Err(TrainError::invalid_config(format!(
                "{} samples but {} labels",
                samples.len(),
                labels.len()
            )));
        }
        if num_classes == 0 {
            return Err(TrainError::invalid_config("num_classes must be positive"));
        }
        if let Some((index, &label)) = labels
            .iter()
            .enumerate()
            .find(|&(_, &label)| label >= num_classes)
        {
            return Err(TrainError::LabelOutOfRange {
                index,
                label,
                num_classes,
            });
        }
        Ok(Self {
            name: name.into(),
            samples,
            labels,
            num_classes,
            num_features,
        })
    }

    /// Returns sample `index`, if present.
    #[must_use]
    pub fn sample(&self, index: usize) -> Option<&T> {
        self.samples.get(index)
    }

    /// Returns every sample in index order.
    #[must_use]
    pub fn samples(&self) -> &[T] {
        &self.samples
    }
}

impl InMemoryDataset<EncodedGraph> {
    /// Builds a graph classification dataset from encoded graphs.
    ///
    /// The feature width is taken from the widest graph.
    ///
    /// # Errors
    /// Propagates the validation errors of [`InMemoryDataset::new`].
    pub fn from_graphs(
        name: impl Into<String>,
        graphs: Vec<EncodedGraph>,
        labels: Vec<usize>,
        num_classes: usize,
    ) -> Result<Self> {
        let width = graphs
            .iter()
            .map(EncodedGraph::feature_dim)
            .max()
            .unwrap_or(0);
        Self::new(name, graphs, labels, num_classes, width)
    }
}

impl<T> LabeledDataset for InMemoryDataset<T> {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn label(&self, index: usize) -> Result<usize> {
        self.labels
            .get(index)
            .copied()
            .ok_or(TrainError::IndexOutOfBounds {
                index,
                len: self.labels.len(),
            })
    }
}
