//! Stratified k-fold splitting for cross-validation.

use std::collections::BTreeMap;

use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::{
    config::EpochSelect,
    dataset::LabeledDataset,
    error::{Result, TrainError},
};

/// Sample indices of one cross-validation fold, each sorted ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fold {
    /// Indices used for training.
    pub train: Vec<usize>,
    /// Indices used for validation.
    pub val: Vec<usize>,
    /// Indices held out for testing.
    pub test: Vec<usize>,
}

/// Splits `dataset` into `folds` stratified folds.
///
/// Each class's indices are shuffled with `seed` and dealt round-robin, so
/// test folds partition the dataset and differ in size by at most one. The
/// validation set is the test fold itself for [`EpochSelect::TestMax`] and
/// the preceding test fold (cyclically) for [`EpochSelect::ValMax`].
/// Training sets hold every index in neither.
///
/// # Errors
/// Returns [`TrainError::EmptyDataset`] for an empty dataset and
/// [`TrainError::InvalidConfig`] when `folds < 2` or `folds` exceeds the
/// number of samples.
///
/// # Examples
/// ```
/// use motifgraph_train::{EpochSelect, InMemoryDataset, k_fold};
///
/// let data = InMemoryDataset::new("toy", vec![(); 6], vec![0, 0, 0, 1, 1, 1], 2, 1)?;
/// let folds = k_fold(&data, 3, EpochSelect::TestMax, 7)?;
/// assert_eq!(folds.len(), 3);
/// assert!(folds.iter().all(|fold| fold.test.len() == 2 && fold.train.len() == 4));
/// # Ok::<(), motifgraph_train::TrainError>(())
/// ```
pub fn k_fold<D: LabeledDataset + ?Sized>(
    dataset: &D,
    folds: usize,
    epoch_select: EpochSelect,
    seed: u64,
) -> Result<Vec<Fold>> {
    let len = dataset.len();
    if len == 0 {
        return Err(TrainError::EmptyDataset {
            dataset: dataset.name().to_owned(),
        });
    }
    if folds < 2 || folds > len {
        return Err(TrainError::invalid_config(format!(
            "`folds` must lie in 2..={len}, got {folds}"
        )));
    }

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for index in 0..len {
        by_class.entry(dataset.label(index)?).or_default().push(index);
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut tests = vec![Vec::new(); folds];
    let mut slot = 0;
    for members in by_class.values_mut() {
        members.shuffle(&mut rng);
        for &index in members.iter() {
            if let Some(fold) = tests.get_mut(slot % folds) {
                fold.push(index);
            }
            slot += 1;
        }
    }
    for fold in &mut tests {
        fold.sort_unstable();
    }

    let vals: Vec<Vec<usize>> = (0..folds)
        .map(|fold| {
            let source = match epoch_select {
                EpochSelect::TestMax => fold,
                EpochSelect::ValMax => (fold + folds - 1) % folds,
            };
            tests.get(source).cloned().unwrap_or_default()
        })
        .collect();

    Ok(tests
        .into_iter()
        .zip(vals)
        .map(|(test, val)| {
            let mut held_out = vec![false; len];
            for &index in test.iter().chain(&val) {
                if let Some(flag) = held_out.get_mut(index) {
                    *flag = true;
                }
            }
            let train = (0..len)
                .filter(|&index| !held_out.get(index).copied().unwrap_or(true))
                .collect();
            Fold { train, val, test }
        })
        .collect())
}
