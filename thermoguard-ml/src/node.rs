//! Isolation tree node implementation
//!
//! Nodes live in a flat arena inside each tree and refer to their children by
//! index. Trees are univariate, so an internal node only needs a split value.

/// Euler-Mascheroni constant
const EULER: f64 = 0.577_215_664_901_532_9;

/// Node type in the isolation tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeType {
    /// Internal node with split condition
    Internal {
        /// Values below go left, the rest go right
        split_value: f64,
        /// Left child index
        left: u32,
        /// Right child index
        right: u32,
    },
    /// Leaf node (external)
    External {
        /// Number of training values that reached this leaf
        size: usize,
    },
}

/// Arena node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Node type and data
    pub node_type: NodeType,
    /// Edges from the root
    pub depth: u16,
}

impl Node {
    /// Create an internal node
    pub fn internal(split_value: f64, left: u32, right: u32, depth: u16) -> Self {
        Self {
            node_type: NodeType::Internal {
                split_value,
                left,
                right,
            },
            depth,
        }
    }

    /// Create an external (leaf) node
    pub fn external(size: usize, depth: u16) -> Self {
        Self {
            node_type: NodeType::External { size },
            depth,
        }
    }

    /// Check if node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self.node_type, NodeType::External { .. })
    }

    /// Path length credited to a value ending at this node
    ///
    /// Leaves add the expected depth of the subtree they stand in for.
    pub fn path_length(&self) -> f64 {
        match self.node_type {
            NodeType::External { size } => self.depth as f64 + c_factor(size),
            NodeType::Internal { .. } => self.depth as f64,
        }
    }

    /// Child to visit next, `None` at a leaf
    pub fn traverse(&self, value: f64) -> Option<u32> {
        match self.node_type {
            NodeType::Internal {
                split_value,
                left,
                right,
            } => Some(if value < split_value { left } else { right }),
            NodeType::External { .. } => None,
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` values
///
/// `c(n) = 2 H(n-1) - 2 (n-1) / n` with `H(i) ≈ ln(i) + γ`.
pub fn c_factor(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER) - 2.0 * (n - 1.0) / n
        }
    }
}
