//! Benchmark parameter types.

use std::fmt;

/// Parameters for one synthetic-tree benchmark run.
#[derive(Clone, Debug)]
pub struct TreeBenchParams {
    /// Number of nodes in the tree.
    pub node_count: usize,
    /// Chance, in percent, that a new node starts a side branch.
    pub branching_percent: u32,
}

impl fmt::Display for TreeBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},b={}%", self.node_count, self.branching_percent)
    }
}

/// Parameters for a persistence landscape benchmark run.
#[derive(Clone, Debug)]
pub struct LandscapeBenchParams {
    /// Number of nodes in the tree.
    pub node_count: usize,
    /// Samples per landscape layer.
    pub resolution: usize,
}

impl fmt::Display for LandscapeBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},res={}", self.node_count, self.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn labels_are_compact() {
        let tree = TreeBenchParams {
            node_count: 1_000,
            branching_percent: 10,
        };
        assert_eq!(tree.to_string(), "n=1000,b=10%");
        let landscape = LandscapeBenchParams {
            node_count: 500,
            resolution: 64,
        };
        assert_eq!(landscape.to_string(), "n=500,res=64");
    }
}
