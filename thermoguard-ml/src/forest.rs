//! Isolation Forest implementation
//!
//! Combines many isolation trees, each grown on its own random sub-sample of
//! the training values, and averages their path lengths into one score.

use crate::{
    calculate_anomaly_score, IsolationScore, IsolationTree, MLError, MLResult, TreeConfig,
    DEFAULT_NUM_TREES, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED,
};
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// Configuration for Isolation Forest
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub num_trees: usize,
    /// Sub-sample size for each tree, capped at the number of values
    pub sample_size: usize,
    /// Maximum tree depth, `ceil(log2(sub-sample))` when unset
    pub max_depth: Option<usize>,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            num_trees: DEFAULT_NUM_TREES,
            sample_size: DEFAULT_SAMPLE_SIZE,
            max_depth: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl ForestConfig {
    /// Reject configurations that cannot build a forest
    pub fn validate(&self) -> MLResult<()> {
        if self.num_trees == 0 {
            return Err(MLError::InvalidConfig("num_trees must be positive"));
        }
        if self.sample_size == 0 {
            return Err(MLError::InvalidConfig("sample_size must be positive"));
        }
        if self.max_depth == Some(0) {
            return Err(MLError::InvalidConfig("max_depth must be positive"));
        }
        Ok(())
    }
}

/// Isolation Forest over scalar values
#[derive(Debug, Clone)]
pub struct IsolationForest {
    /// Individual trees
    trees: Vec<IsolationTree>,
    /// Configuration
    config: ForestConfig,
    /// Effective sub-sample size of the last fit
    sample_size: usize,
    /// Number of values used for training
    num_samples: usize,
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl IsolationForest {
    /// Create a new, unfitted forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            trees: Vec::new(),
            config,
            sample_size: 0,
            num_samples: 0,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Whether [`fit`](Self::fit) has succeeded
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Train the forest on values
    ///
    /// The sampling sequence restarts from the configured seed on every call,
    /// so fitting the same values twice yields the same forest.
    pub fn fit(&mut self, values: &[f64]) -> MLResult<()> {
        self.config.validate()?;
        if values.is_empty() {
            return Err(MLError::InsufficientData);
        }

        let sample_size = self.config.sample_size.min(values.len());
        let max_depth = self
            .config
            .max_depth
            .unwrap_or_else(|| height_limit(sample_size));
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        self.trees.clear();
        self.sample_size = sample_size;
        self.num_samples = values.len();

        for i in 0..self.config.num_trees {
            // Unique seed per tree
            let tree_config = TreeConfig {
                max_depth,
                seed: self.config.seed.wrapping_add(i as u64),
            };
            let mut tree = IsolationTree::new(tree_config);

            let subset = sample_subset(&mut rng, values, sample_size);
            tree.fit(&subset)?;

            self.trees.push(tree);
        }

        Ok(())
    }

    /// Calculate anomaly score for a value
    ///
    /// An unfitted forest scores everything as 0.5.
    pub fn anomaly_score(&self, value: f64) -> IsolationScore {
        if self.trees.is_empty() {
            return IsolationScore::new(0.5, 0.0, 0);
        }

        let total_path_length: f64 = self.trees.iter().map(|tree| tree.path_length(value)).sum();
        let avg_path_length = total_path_length / self.trees.len() as f64;

        let score = calculate_anomaly_score(avg_path_length, self.sample_size);

        IsolationScore::new(score, avg_path_length, self.trees.len())
    }

    /// Scores for many values, in input order
    pub fn score_samples(&self, values: &[f64]) -> Vec<IsolationScore> {
        values.iter().map(|&v| self.anomaly_score(v)).collect()
    }

    /// Get forest statistics
    pub fn stats(&self) -> ForestStats {
        let total_nodes: usize = self.trees.iter().map(|t| t.node_count()).sum();

        let max_depth = self.trees.iter().map(|t| t.depth()).max().unwrap_or(0);

        ForestStats {
            num_trees: self.trees.len(),
            total_nodes,
            max_depth,
            sample_size: self.sample_size,
            num_samples: self.num_samples,
        }
    }
}

/// Forest statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestStats {
    /// Number of trees
    pub num_trees: usize,
    /// Total nodes across all trees
    pub total_nodes: usize,
    /// Deepest node across all trees
    pub max_depth: usize,
    /// Sub-sample size each tree was grown on
    pub sample_size: usize,
    /// Number of training values
    pub num_samples: usize,
}

/// `ceil(log2(n))`, at least 1
fn height_limit(sample_size: usize) -> usize {
    (sample_size.max(2) as f64).log2().ceil() as usize
}

/// Draw `size` values without replacement
fn sample_subset(rng: &mut StdRng, values: &[f64], size: usize) -> Vec<f64> {
    // If sample size >= data size, use all data
    if size >= values.len() {
        return values.to_vec();
    }

    index::sample(rng, values.len(), size)
        .into_iter()
        .map(|i| values[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_data() -> Vec<f64> {
        // Normal cluster
        let mut values: Vec<f64> = (0..60).map(|i| 20.0 + (i % 15) as f64 * 0.1).collect();
        // Anomalies
        values.push(35.0);
        values.push(5.0);
        values
    }

    #[test]
    fn test_forest_creation() {
        let forest = IsolationForest::default();
        assert!(!forest.is_fitted());
        assert_eq!(forest.config().num_trees, 100);
        assert_eq!(forest.anomaly_score(1.0).score, 0.5);
    }

    #[test]
    fn test_forest_fit() {
        let config = ForestConfig {
            num_trees: 5,
            sample_size: 10,
            max_depth: Some(6),
            seed: 123,
        };
        let mut forest = IsolationForest::new(config);

        forest.fit(&create_test_data()).unwrap();

        let stats = forest.stats();
        assert_eq!(stats.num_trees, 5);
        assert_eq!(stats.sample_size, 10);
        assert_eq!(stats.num_samples, 62);
        assert!(stats.total_nodes > 0);
        assert!(stats.max_depth <= 6);
    }

    #[test]
    fn test_anomaly_detection() {
        let mut forest = IsolationForest::default();
        let values = create_test_data();

        forest.fit(&values).unwrap();

        let normal = forest.anomaly_score(20.7);
        let high = forest.anomaly_score(35.0);
        let low = forest.anomaly_score(5.0);

        assert!(high.score > normal.score);
        assert!(low.score > normal.score);
        assert!(high.score > 0.5);
        assert_eq!(high.num_trees, 100);
    }

    #[test]
    fn default_height_limit_follows_sub_sample() {
        assert_eq!(height_limit(256), 8);
        assert_eq!(height_limit(62), 6);
        assert_eq!(height_limit(1), 1);

        let mut forest = IsolationForest::default();
        forest.fit(&create_test_data()).unwrap();
        assert!(forest.stats().max_depth <= 6);
        assert_eq!(forest.stats().sample_size, 62);
    }

    #[test]
    fn fit_is_deterministic() {
        let values: Vec<f64> = (0..400).map(|i| ((i * 37) % 101) as f64 * 0.05).collect();

        let mut a = IsolationForest::default();
        let mut b = IsolationForest::default();
        a.fit(&values).unwrap();
        b.fit(&values).unwrap();

        assert_eq!(a.score_samples(&values), b.score_samples(&values));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut forest = IsolationForest::new(ForestConfig {
            num_trees: 0,
            ..ForestConfig::default()
        });
        assert_eq!(
            forest.fit(&[1.0, 2.0]),
            Err(MLError::InvalidConfig("num_trees must be positive"))
        );

        let mut forest = IsolationForest::default();
        assert_eq!(forest.fit(&[]), Err(MLError::InsufficientData));
    }

    #[test]
    fn sub_sample_draws_distinct_positions() {
        let values: Vec<f64> = (0..300).map(f64::from).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let mut subset = sample_subset(&mut rng, &values, 256);
        assert_eq!(subset.len(), 256);
        subset.sort_by(f64::total_cmp);
        subset.dedup();
        assert_eq!(subset.len(), 256);

        assert_eq!(sample_subset(&mut rng, &values[..5], 256).len(), 5);
    }
}
