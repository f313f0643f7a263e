// ============================================================
// Layer 5 - Regression Tree (CART)
// ============================================================
// A binary decision tree that predicts a continuous target.
//
// Growing a node:
//   1. If the node holds fewer than min_samples_split samples,
//      all targets are equal, or max_depth is reached → leaf
//   2. Otherwise, for every feature, sort the node's samples by
//      that feature and try each threshold halfway between two
//      consecutive distinct values
//   3. Keep the threshold with the lowest summed squared error
//      of the two children (SSE = Σy² - (Σy)²/n per child)
//   4. Samples with x[feature] <= threshold go left, others right
//
// If no feature has two distinct values the node is a leaf.
// Leaf value = mean target of the samples that reached it.
//
// Nodes live in a flat Vec (an arena) and refer to children by
// index, which keeps the tree trivially serialisable.
//
// Reference: Breiman et al. (1984) Classification and Regression Trees

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature:   usize,
        threshold: f64,
        left:      usize,
        right:     usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Nodes with fewer samples than this become leaves
    pub min_samples_split: usize,
    /// None grows until leaves are pure
    pub max_depth:         Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self { min_samples_split: 2, max_depth: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

/// The best split found for one node.
struct SplitCandidate {
    feature:   usize,
    threshold: f64,
    sse:       f64,
}

impl RegressionTree {
    /// Grow a tree on the rows of `x` / `y` selected by `samples`.
    /// `samples` may repeat indices (bootstrap draws).
    ///
    /// # Panics
    /// Panics if `samples` is empty; callers check for an empty
    /// training set before growing trees.
    pub fn fit(x: &[Vec<f64>], y: &[f64], samples: &[usize], params: TreeParams) -> Self {
        assert!(!samples.is_empty(), "cannot grow a tree on zero samples");

        let mut tree = Self { nodes: Vec::new() };
        tree.grow(x, y, samples.to_vec(), 0, params);
        tree
    }

    /// Walk from the root to a leaf and return its value.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split { feature, threshold, left, right } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Recursively build the subtree for `samples`; returns its node index.
    fn grow(
        &mut self,
        x:       &[Vec<f64>],
        y:       &[f64],
        samples: Vec<usize>,
        depth:   usize,
        params:  TreeParams,
    ) -> usize {
        let idx  = self.nodes.len();
        let mean = samples.iter().map(|&i| y[i]).sum::<f64>() / samples.len() as f64;
        self.nodes.push(Node::Leaf { value: mean });

        let depth_reached = params.max_depth.is_some_and(|d| depth >= d);
        let first = y[samples[0]];
        let pure  = samples.iter().all(|&i| y[i] == first);

        if samples.len() < params.min_samples_split || depth_reached || pure {
            return idx;
        }

        let Some(split) = best_split(x, y, &samples) else {
            return idx;
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .partition(|&&i| x[i][split.feature] <= split.threshold);

        let left  = self.grow(x, y, left_samples, depth + 1, params);
        let right = self.grow(x, y, right_samples, depth + 1, params);

        self.nodes[idx] = Node::Split {
            feature:   split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }
}

fn best_split(x: &[Vec<f64>], y: &[f64], samples: &[usize]) -> Option<SplitCandidate> {
    let n_features = x[samples[0]].len();
    let n          = samples.len();
    let total_sum: f64    = samples.iter().map(|&i| y[i]).sum();
    let total_sq_sum: f64 = samples.iter().map(|&i| y[i] * y[i]).sum();

    let mut best: Option<SplitCandidate> = None;
    let mut order = samples.to_vec();

    for feature in 0..n_features {
        // Stable sort keeps ties in sample order, so results are reproducible
        order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum    = 0.0;
        let mut left_sq_sum = 0.0;

        for k in 1..n {
            let prev = order[k - 1];
            left_sum    += y[prev];
            left_sq_sum += y[prev] * y[prev];

            let lo = x[prev][feature];
            let hi = x[order[k]][feature];
            if lo >= hi {
                continue;
            }

            let n_left  = k as f64;
            let n_right = (n - k) as f64;
            let right_sum    = total_sum - left_sum;
            let right_sq_sum = total_sq_sum - left_sq_sum;

            let sse = (left_sq_sum - left_sum * left_sum / n_left)
                + (right_sq_sum - right_sum * right_sum / n_right);

            if best.as_ref().map_or(true, |b| sse < b.sse) {
                best = Some(SplitCandidate { feature, threshold: midpoint(lo, hi), sse });
            }
        }
    }

    best
}

/// Halfway between two values, never rounding up onto `hi`.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid >= hi { lo } else { mid }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn all(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_step_function_is_learned_exactly() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let y: Vec<f64>      = (0..10).map(|i| if i < 5 { 10.0 } else { 90.0 }).collect();
        let tree = RegressionTree::fit(&x, &y, &all(10), TreeParams::default());

        assert_eq!(tree.predict(&[2.0]), 10.0);
        assert_eq!(tree.predict(&[7.0]), 90.0);
        // One split, two leaves
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_picks_the_informative_feature() {
        // Feature 0 is noise, feature 1 decides the target
        let x = vec![
            vec![1.0, 0.0],
            vec![2.0, 1.0],
            vec![1.0, 1.0],
            vec![2.0, 0.0],
        ];
        let y = vec![50.0, 80.0, 80.0, 50.0];
        let tree = RegressionTree::fit(&x, &y, &all(4), TreeParams::default());

        match &tree.nodes[0] {
            Node::Split { feature, threshold, .. } => {
                assert_eq!(*feature, 1);
                assert_eq!(*threshold, 0.5);
            }
            other => panic!("expected a split at the root, got {other:?}"),
        }
    }

    #[test]
    fn test_constant_features_make_a_leaf() {
        let x = vec![vec![1.0], vec![1.0], vec![1.0]];
        let y = vec![60.0, 70.0, 80.0];
        let tree = RegressionTree::fit(&x, &y, &all(3), TreeParams::default());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&[1.0]), 70.0);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64]).collect();
        let y: Vec<f64>      = (0..8).map(|i| i as f64).collect();
        let params = TreeParams { max_depth: Some(1), ..Default::default() };
        let tree   = RegressionTree::fit(&x, &y, &all(8), params);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_repeated_bootstrap_indices() {
        let x = vec![vec![0.0], vec![1.0]];
        let y = vec![10.0, 20.0];
        let tree = RegressionTree::fit(&x, &y, &[0, 0, 0, 1], TreeParams::default());
        assert_eq!(tree.predict(&[0.0]), 10.0);
        assert_eq!(tree.predict(&[1.0]), 20.0);
    }

    #[test]
    fn test_midpoint_never_equals_upper_bound() {
        assert_eq!(midpoint(1.0, 2.0), 1.5);
        let lo = 1.0_f64;
        let hi = f64::from_bits(lo.to_bits() + 1);
        assert!(midpoint(lo, hi) < hi);
    }
}
