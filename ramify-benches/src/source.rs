//! Synthetic neuronal trees for benchmarking.
//!
//! Provides [`SyntheticTree`], a seeded random tree grown one node at a
//! time. Each new node either extends the previous node or, with the
//! configured probability, sprouts a side branch from a random earlier node.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use ramify_core::{GraphError, NodeId, NodeRecord, Point3, TreeGraph};

/// Recentres the lateral components of each growth step around zero.
const LATERAL_OFFSET: Point3 = Point3::new(1.0, 0.0, 1.0);

/// Errors that may occur during synthetic tree generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested node count was zero.
    #[error("node count must be greater than zero")]
    ZeroNodes,
    /// The branching probability exceeded 100 percent.
    #[error("branching probability must be at most 100% (got {got}%)")]
    BranchingOutOfRange {
        /// The requested percentage.
        got: u32,
    },
}

/// Configuration for synthetic tree generation.
#[derive(Clone, Debug)]
pub struct SyntheticTreeConfig {
    /// Number of nodes to generate.
    pub node_count: usize,
    /// Chance, in percent, that a new node starts a side branch.
    pub branching_percent: u32,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Node records of a random tree rooted at the origin.
///
/// # Examples
///
/// ```
/// use ramify_benches::source::{SyntheticTree, SyntheticTreeConfig};
///
/// let config = SyntheticTreeConfig { node_count: 50, branching_percent: 20, seed: 7 };
/// let tree = SyntheticTree::generate(&config).expect("valid config");
/// let graph = tree.build().expect("records form a tree");
/// assert_eq!(graph.len(), 50);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticTree {
    records: Vec<NodeRecord>,
}

impl SyntheticTree {
    /// Generates the records eagerly from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError::ZeroNodes`] if `node_count` is zero, or
    /// [`SyntheticError::BranchingOutOfRange`] if `branching_percent`
    /// exceeds 100.
    pub fn generate(config: &SyntheticTreeConfig) -> Result<Self, SyntheticError> {
        if config.node_count == 0 {
            return Err(SyntheticError::ZeroNodes);
        }
        if config.branching_percent > 100 {
            return Err(SyntheticError::BranchingOutOfRange {
                got: config.branching_percent,
            });
        }

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut positions = Vec::with_capacity(config.node_count);
        let mut records = Vec::with_capacity(config.node_count);
        positions.push(Point3::ORIGIN);
        records.push(NodeRecord::new(NodeId(0), None, Point3::ORIGIN));

        for idx in 1..config.node_count {
            let parent = if rng.gen_ratio(config.branching_percent, 100) {
                rng.gen_range(0..idx)
            } else {
                idx - 1
            };
            // Mostly upward, with lateral jitter in [-1, 1).
            let step = Point3::new(
                rng.gen_range(0.0..2.0),
                rng.gen_range(0.5..1.5),
                rng.gen_range(0.0..2.0),
            ) - LATERAL_OFFSET;
            let position = positions.get(parent).copied().unwrap_or_default() + step;
            positions.push(position);
            records.push(NodeRecord::new(
                NodeId(idx as u64),
                Some(NodeId(parent as u64)),
                position,
            ));
        }

        Ok(Self { records })
    }

    /// The generated records, root first.
    #[must_use]
    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    /// Number of generated nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`: generation rejects zero nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds the tree graph.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError`] from graph construction.
    pub fn build(&self) -> Result<TreeGraph, GraphError> {
        TreeGraph::from_records(self.records.iter().copied())
    }
}
