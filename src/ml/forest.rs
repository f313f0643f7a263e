// ============================================================
// Layer 5 - Random Forest Regressor
// ============================================================
// An ensemble of regression trees, each grown on a bootstrap
// sample (n draws with replacement) of the training rows.
// The forest prediction is the mean of the tree predictions.
//
// Determinism:
//   A master StdRng is seeded from ForestParams::seed. Each tree
//   draws its own u64 seed from the master before sampling, so
//   the same seed, tree count and data always give the same
//   forest, tree for tree.
//
// Reference: Breiman (2001) Random Forests
//            rand crate documentation

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ml::{
    tree::{RegressionTree, TreeParams},
    PipelineError,
};

pub const DEFAULT_N_TREES: usize = 100;
pub const DEFAULT_SEED:    u64   = 42;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees:   usize,
    pub seed:      u64,
    /// false grows every tree on the full training set
    pub bootstrap: bool,
    pub tree:      TreeParams,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees:   DEFAULT_N_TREES,
            seed:      DEFAULT_SEED,
            bootstrap: true,
            tree:      TreeParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    /// Fit `params.n_trees` trees on the feature matrix `x`
    /// (one Vec per row) and targets `y`.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> Result<Self, PipelineError> {
        if x.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }
        if x.len() != y.len() {
            return Err(PipelineError::LengthMismatch { rows: x.len(), targets: y.len() });
        }
        if params.n_trees == 0 {
            return Err(PipelineError::InvalidParams("n_trees must be at least 1".into()));
        }

        let n       = x.len();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let all: Vec<usize> = (0..n).collect();

        let trees = (0..params.n_trees)
            .map(|_| {
                let mut tree_rng = StdRng::seed_from_u64(rng.gen());
                if params.bootstrap {
                    let draws: Vec<usize> = (0..n).map(|_| tree_rng.gen_range(0..n)).collect();
                    RegressionTree::fit(x, y, &draws, params.tree)
                } else {
                    RegressionTree::fit(x, y, &all, params.tree)
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Forest grown: {} trees, {} nodes total",
            trees.len(),
            trees.iter().map(RegressionTree::node_count).sum::<usize>()
        );

        Ok(Self { trees })
    }

    /// Mean of all tree predictions for one encoded row.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
