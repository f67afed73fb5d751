//! Bootstrap-aggregated CART regression trees.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::ForestConfig;

use super::Regressor;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single regression tree grown by greedy variance reduction.
///
/// Nodes are stored flat; index 0 is the root.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

/// Training inputs shared by every node of one tree.
struct GrowContext<'a, R> {
    rows: &'a [R],
    targets: &'a [f64],
    max_depth: usize,
    min_samples_split: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    /// Grows a tree on the given sample (duplicates allowed) and returns it
    /// with its unnormalized per-feature impurity decrease.
    fn grow<R: AsRef<[f64]>>(
        rows: &[R],
        targets: &[f64],
        sample: Vec<usize>,
        max_depth: usize,
        min_samples_split: usize,
    ) -> (Self, Vec<f64>) {
        let n_features = rows.first().map_or(0, |r| r.as_ref().len());
        let ctx = GrowContext {
            rows,
            targets,
            max_depth,
            min_samples_split,
        };
        let mut tree = Self { nodes: Vec::new() };
        let mut importance = vec![0.0; n_features];
        tree.grow_node(&ctx, sample, 0, &mut importance);
        (tree, importance)
    }

    fn grow_node<R: AsRef<[f64]>>(
        &mut self,
        ctx: &GrowContext<'_, R>,
        sample: Vec<usize>,
        depth: usize,
        importance: &mut [f64],
    ) -> usize {
        let id = self.nodes.len();
        let n = sample.len().max(1) as f64;
        let value = sample.iter().map(|&i| ctx.targets[i]).sum::<f64>() / n;
        self.nodes.push(Node::Leaf { value });

        if depth >= ctx.max_depth || sample.len() < ctx.min_samples_split {
            return id;
        }
        let Some(best) = best_split(ctx, &sample, importance.len()) else {
            return id;
        };

        importance[best.feature] += best.gain;
        let (left, right): (Vec<usize>, Vec<usize>) = sample
            .into_iter()
            .partition(|&i| ctx.rows[i].as_ref()[best.feature] <= best.threshold);

        let left = self.grow_node(ctx, left, depth + 1, importance);
        let right = self.grow_node(ctx, right, depth + 1, importance);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }
}

impl Regressor for RegressionTree {
    fn predict(&self, features: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(Node::Leaf { value }) => return *value,
                Some(&Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    id = if features[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
                None => return 0.0,
            }
        }
    }
}

/// Finds the split with the largest reduction in summed squared error.
///
/// Only thresholds between distinct feature values are considered.
fn best_split<R: AsRef<[f64]>>(
    ctx: &GrowContext<'_, R>,
    sample: &[usize],
    n_features: usize,
) -> Option<BestSplit> {
    let n = sample.len() as f64;
    let total: f64 = sample.iter().map(|&i| ctx.targets[i]).sum();
    let parent_score = total * total / n;

    let mut best: Option<BestSplit> = None;
    let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(sample.len());
    for feature in 0..n_features {
        pairs.clear();
        pairs.extend(
            sample
                .iter()
                .map(|&i| (ctx.rows[i].as_ref()[feature], ctx.targets[i])),
        );
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_sum = 0.0;
        for k in 0..pairs.len().saturating_sub(1) {
            left_sum += pairs[k].1;
            let (lo, hi) = (pairs[k].0, pairs[k + 1].0);
            if lo >= hi {
                continue;
            }
            let n_left = (k + 1) as f64;
            let n_right = n - n_left;
            let right_sum = total - left_sum;
            let gain =
                left_sum * left_sum / n_left + right_sum * right_sum / n_right - parent_score;
            if gain > best.as_ref().map_or(1e-12, |b| b.gain) {
                let mid = lo + (hi - lo) / 2.0;
                best = Some(BestSplit {
                    feature,
                    threshold: if mid < hi { mid } else { lo },
                    gain,
                });
            }
        }
    }
    best
}

/// Random forest regressor with mean-decrease-in-impurity importances.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    /// Fits `config.n_trees` trees, each on a bootstrap sample drawn from a
    /// per-tree seed derived from `config.seed`.
    ///
    /// All features are considered at every split. `rows` and `targets` must
    /// have the same length.
    pub(crate) fn fit<R: AsRef<[f64]>>(rows: &[R], targets: &[f64], config: &ForestConfig) -> Self {
        debug_assert_eq!(rows.len(), targets.len(), "rows and targets must align");
        let n = rows.len();
        let n_features = rows.first().map_or(0, |r| r.as_ref().len());
        let mut master = StdRng::seed_from_u64(config.seed);

        let mut trees = Vec::with_capacity(config.n_trees);
        let mut summed = vec![0.0; n_features];
        for _ in 0..config.n_trees {
            let mut rng = StdRng::seed_from_u64(master.random::<u64>());
            let sample: Vec<usize> = if n == 0 {
                Vec::new()
            } else {
                (0..n).map(|_| rng.random_range(0..n)).collect()
            };
            let (tree, importance) = RegressionTree::grow(
                rows,
                targets,
                sample,
                config.max_depth,
                config.min_samples_split,
            );
            let tree_total: f64 = importance.iter().sum();
            if tree_total > 0.0 {
                for (s, v) in summed.iter_mut().zip(&importance) {
                    *s += v / tree_total;
                }
            }
            trees.push(tree);
        }

        Self {
            trees,
            feature_importances: normalize(summed),
        }
    }

    /// Importances in feature order; they sum to 1.
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn max_tree_depth(&self) -> usize {
        self.trees.iter().map(RegressionTree::depth).max().unwrap_or(0)
    }
}

impl Regressor for RandomForest {
    fn predict(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        sum / self.trees.len() as f64
    }
}

/// Scales to sum 1; an all-zero vector becomes uniform.
fn normalize(values: Vec<f64>) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.into_iter().map(|v| v / total).collect()
    } else if values.is_empty() {
        values
    } else {
        let uniform = 1.0 / values.len() as f64;
        vec![uniform; values.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(n_trees: usize, max_depth: usize) -> ForestConfig {
        ForestConfig {
            n_trees,
            max_depth,
            ..ForestConfig::default()
        }
    }

    #[test]
    fn single_tree_learns_step_function() {
        let rows: Vec<[f64; 1]> = (0..20).map(|i| [i as f64]).collect();
        let y: Vec<f64> = rows.iter().map(|r| if r[0] < 10.0 { 1.0 } else { 5.0 }).collect();
        let sample: Vec<usize> = (0..rows.len()).collect();
        let (tree, importance) = RegressionTree::grow(&rows, &y, sample, 4, 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(&[3.0]), 1.0);
        assert_eq!(tree.predict(&[15.0]), 5.0);
        assert!(importance[0] > 0.0);
    }

    #[test]
    fn respects_max_depth() {
        let rows: Vec<[f64; 1]> = (0..64).map(|i| [i as f64]).collect();
        let y: Vec<f64> = rows.iter().map(|r| (r[0] * 0.37).sin()).collect();
        let forest = RandomForest::fit(&rows, &y, &config(5, 3));
        assert_eq!(forest.n_trees(), 5);
        assert!(forest.max_tree_depth() <= 3);
    }

    #[test]
    fn importances_favor_informative_feature() {
        // x0 drives the target, x1 is noise-free filler
        let rows: Vec<[f64; 2]> = (0..80)
            .map(|i| [i as f64, ((i * 37) % 11) as f64])
            .collect();
        let y: Vec<f64> = rows.iter().map(|r| 2.0 * r[0]).collect();
        let forest = RandomForest::fit(&rows, &y, &config(20, 6));
        let imp = forest.feature_importances();
        assert!((imp.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(imp[0] > imp[1]);
    }

    #[test]
    fn constant_target_gives_uniform_importance() {
        let rows: Vec<[f64; 3]> = (0..10).map(|i| [i as f64, 1.0, 2.0]).collect();
        let y = vec![4.0; 10];
        let forest = RandomForest::fit(&rows, &y, &config(3, 4));
        for v in forest.feature_importances() {
            assert!((v - 1.0 / 3.0).abs() < 1e-12);
        }
        assert_eq!(forest.predict(&[5.0, 1.0, 2.0]), 4.0);
    }

    #[test]
    fn fit_is_deterministic_for_seed() {
        let rows: Vec<[f64; 2]> = (0..40).map(|i| [i as f64, (i % 7) as f64]).collect();
        let y: Vec<f64> = rows.iter().map(|r| r[0].sqrt() + r[1]).collect();
        let a = RandomForest::fit(&rows, &y, &config(10, 5));
        let b = RandomForest::fit(&rows, &y, &config(10, 5));
        for r in &rows {
            assert_eq!(a.predict(r), b.predict(r));
        }
        assert_eq!(a.feature_importances(), b.feature_importances());
    }
}
