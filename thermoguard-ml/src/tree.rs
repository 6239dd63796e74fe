//! Isolation tree implementation
//!
//! Trees are built by recursively splitting a sub-sample of values at a
//! uniformly random point between its minimum and maximum, until each value
//! is isolated or the height limit is reached.

use crate::{MLError, MLResult, Node, NodeType};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Configuration for isolation tree
#[derive(Debug, Clone, Copy)]
pub struct TreeConfig {
    /// Maximum depth of tree
    pub max_depth: usize,
    /// Random seed for this tree
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8, // ceil(log2(256))
            seed: 42,
        }
    }
}

/// Isolation tree over scalar values
#[derive(Debug, Clone)]
pub struct IsolationTree {
    /// Tree nodes in array representation, root first
    pub nodes: Vec<Node>,
    /// Configuration
    pub config: TreeConfig,
    /// Random number generator
    rng: StdRng,
}

impl IsolationTree {
    /// Create a new isolation tree
    pub fn new(config: TreeConfig) -> Self {
        Self {
            nodes: Vec::new(),
            config,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Train the tree on values
    ///
    /// Refitting restarts the random sequence, so the same values always give
    /// the same tree.
    pub fn fit(&mut self, values: &[f64]) -> MLResult<()> {
        if values.is_empty() {
            return Err(MLError::InsufficientData);
        }

        // Clear existing tree
        self.nodes.clear();
        self.rng = StdRng::seed_from_u64(self.config.seed);

        self.build_tree(values, 0);

        Ok(())
    }

    /// Build tree recursively, returning the subtree root index
    fn build_tree(&mut self, values: &[f64], depth: u16) -> u32 {
        let node_index = self.nodes.len() as u32;

        // Check termination conditions
        if depth as usize >= self.config.max_depth || values.len() <= 1 {
            self.nodes.push(Node::external(values.len(), depth));
            return node_index;
        }

        // All values identical?
        let (min_val, max_val) = value_range(values);
        if min_val >= max_val {
            self.nodes.push(Node::external(values.len(), depth));
            return node_index;
        }

        let split_value = self.select_split(min_val, max_val);
        let (left_values, right_values): (Vec<f64>, Vec<f64>) =
            values.iter().partition(|&&v| v < split_value);

        // Split landed exactly on the minimum
        if left_values.is_empty() || right_values.is_empty() {
            self.nodes.push(Node::external(values.len(), depth));
            return node_index;
        }

        // Reserve the slot, children are appended after it
        self.nodes.push(Node::external(values.len(), depth));

        let left_index = self.build_tree(&left_values, depth + 1);
        let right_index = self.build_tree(&right_values, depth + 1);

        self.nodes[node_index as usize] = Node::internal(split_value, left_index, right_index, depth);

        node_index
    }

    /// Random split value in `[min, max)`
    fn select_split(&mut self, min_val: f64, max_val: f64) -> f64 {
        if (max_val - min_val).is_finite() {
            self.rng.gen_range(min_val..max_val)
        } else {
            // Range too wide to sample uniformly
            min_val / 2.0 + max_val / 2.0
        }
    }

    /// Calculate path length for a value
    pub fn path_length(&self, value: f64) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }

        let mut current_index = 0usize;

        loop {
            let node = &self.nodes[current_index];

            match node.node_type {
                NodeType::External { .. } => return node.path_length(),
                NodeType::Internal { .. } => match node.traverse(value) {
                    Some(next) if (next as usize) < self.nodes.len() => {
                        current_index = next as usize;
                    }
                    // Shouldn't happen with valid tree
                    _ => return node.depth as f64,
                },
            }
        }
    }

    /// Get the number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get tree depth
    pub fn depth(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| n.depth as usize)
            .max()
            .unwrap_or(0)
    }
}

/// Min and max of a non-empty slice
fn value_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_values() -> Vec<f64> {
        // Normal values
        let mut values = vec![20.0, 22.0, 21.0, 19.0, 20.5, 21.5, 20.2, 21.1];
        // Anomaly
        values.push(35.0);
        values
    }

    #[test]
    fn test_tree_creation() {
        let tree = IsolationTree::new(TreeConfig::default());

        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.path_length(1.0), 0.0);
    }

    #[test]
    fn test_tree_fit() {
        let config = TreeConfig {
            max_depth: 5,
            seed: 123,
        };
        let mut tree = IsolationTree::new(config);

        tree.fit(&create_test_values()).unwrap();

        assert!(tree.node_count() > 0);
        assert!(tree.depth() <= 5);
        assert!(!tree.nodes[0].is_leaf());
    }

    #[test]
    fn test_fit_empty() {
        let mut tree = IsolationTree::new(TreeConfig::default());
        assert_eq!(tree.fit(&[]), Err(MLError::InsufficientData));
    }

    #[test]
    fn identical_values_form_a_single_leaf() {
        let mut tree = IsolationTree::new(TreeConfig::default());
        tree.fit(&[4.0; 16]).unwrap();

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.nodes[0].node_type, NodeType::External { size: 16 });
    }

    #[test]
    fn test_path_length() {
        let values = create_test_values();
        let total = |v: f64| -> f64 {
            (0..50u64)
                .map(|seed| {
                    let mut tree = IsolationTree::new(TreeConfig { max_depth: 8, seed });
                    tree.fit(&values).unwrap();
                    tree.path_length(v)
                })
                .sum()
        };

        // Averaged over many trees the outlier isolates sooner
        assert!(total(35.0) < total(20.5));
    }

    #[test]
    fn refit_is_reproducible() {
        let values = create_test_values();
        let mut tree = IsolationTree::new(TreeConfig::default());

        tree.fit(&values).unwrap();
        let first = tree.nodes.clone();
        tree.fit(&values).unwrap();

        assert_eq!(first, tree.nodes);
    }
}
