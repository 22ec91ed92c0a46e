//! Workload builders shared by the benchmarks.

use std::num::NonZeroUsize;

use motifgraph_core::{BuildConfig, ShapeSpec};
use motifgraph_train::InMemoryDataset;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{error::BenchSetupError, params::BuildBenchParams};

/// Builds the assembly configuration for `params`.
///
/// Houses are attached at random plug-ins and the BA/tree/grid parameter
/// is fixed at two.
#[must_use]
pub fn build_config(params: &BuildBenchParams) -> BuildConfig {
    BuildConfig::new(params.basis, params.width)
        .with_param(2)
        .with_random_plugins(true)
        .with_shapes(std::iter::repeat_n(ShapeSpec::House, params.motifs))
}

/// Creates a dataset of `samples` unit samples with labels drawn uniformly
/// from `classes` classes.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when `classes` is zero and
/// propagates dataset validation failures.
pub fn labelled_dataset(
    samples: usize,
    classes: usize,
    seed: u64,
) -> Result<InMemoryDataset<()>, BenchSetupError> {
    let class_count = NonZeroUsize::new(classes).ok_or(BenchSetupError::ZeroValue {
        context: "classes",
    })?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let labels = (0..samples)
        .map(|_| rng.gen_range(0..class_count.get()))
        .collect();
    Ok(InMemoryDataset::new(
        "bench",
        vec![(); samples],
        labels,
        class_count.get(),
        1,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use motifgraph_core::BasisKind;
    use motifgraph_train::LabeledDataset;
    use rstest::rstest;

    #[rstest]
    fn build_config_attaches_the_requested_motifs() {
        let config = build_config(&BuildBenchParams {
            basis: BasisKind::Tree,
            width: 4,
            motifs: 6,
        });
        assert_eq!(config.shapes().len(), 6);
        assert_eq!(config.param(), 2);
        assert!(config.random_plugins());
    }

    #[rstest]
    fn datasets_respect_the_class_count() -> Result<(), BenchSetupError> {
        let dataset = labelled_dataset(50, 3, 1)?;
        assert_eq!(dataset.len(), 50);
        for index in 0..dataset.len() {
            assert!(dataset.label(index)? < 3);
        }
        Ok(())
    }

    #[rstest]
    fn zero_classes_are_rejected() {
        assert!(matches!(
            labelled_dataset(5, 0, 1),
            Err(BenchSetupError::ZeroValue { context: "classes" })
        ));
    }
}
