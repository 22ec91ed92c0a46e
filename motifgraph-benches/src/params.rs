//! Benchmark parameter types.
//!
//! Each type renders as the Criterion benchmark id of one run.

use std::fmt;

use motifgraph_core::BasisKind;

/// Parameters for a graph assembly benchmark run.
#[derive(Clone, Debug)]
pub struct BuildBenchParams {
    /// Basis topology.
    pub basis: BasisKind,
    /// Basis width.
    pub width: usize,
    /// Number of house motifs attached.
    pub motifs: usize,
}

impl fmt::Display for BuildBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},w={},motifs={}", self.basis, self.width, self.motifs)
    }
}

/// Parameters for a k-fold splitting benchmark run.
#[derive(Clone, Debug)]
pub struct FoldBenchParams {
    /// Number of samples in the dataset.
    pub samples: usize,
    /// Number of folds.
    pub folds: usize,
}

impl fmt::Display for FoldBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.samples, self.folds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn build_params_name_the_basis() {
        let params = BuildBenchParams {
            basis: BasisKind::Ba,
            width: 300,
            motifs: 80,
        };
        assert_eq!(params.to_string(), "ba,w=300,motifs=80");
    }

    #[rstest]
    fn fold_params_are_compact() {
        let params = FoldBenchParams {
            samples: 1_000,
            folds: 10,
        };
        assert_eq!(params.to_string(), "n=1000,k=10");
    }
}
