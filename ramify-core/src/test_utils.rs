//! Shared test fixtures for `ramify-core` unit tests.

use proptest::test_runner::Config as ProptestConfig;
use ramify_test_support::proptest_profile::ProptestRunProfile;

use crate::graph::{NodeId, NodeRecord, Point3, TreeGraph};

/// Builds a standard proptest configuration from the shared profile so every
/// property suite honours `RAMIFY_PROPTEST_CASES`.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases);
    ProptestConfig {
        cases: profile.cases(),
        ..ProptestConfig::default()
    }
}

/// Builds a tree from a parent table: `parents[i]` is the index of the parent
/// of node `i`. Node ids are the indices.
pub(crate) fn tree_from_parents(parents: &[Option<usize>], positions: &[Point3]) -> TreeGraph {
    assert_eq!(parents.len(), positions.len(), "one position per node");
    let records = parents.iter().zip(positions).enumerate().map(|(idx, (parent, position))| {
        NodeRecord::new(node(idx), parent.map(node), *position)
    });
    TreeGraph::from_records(records).expect("fixture must describe a valid tree")
}

pub(crate) fn node(idx: usize) -> NodeId {
    NodeId(u64::try_from(idx).expect("fixture index fits in u64"))
}

/// `nodes` evenly spaced vertices along the x axis from the origin (the root)
/// to `(end, 0, 0)`.
pub(crate) fn straight_line(nodes: usize, end: f64) -> TreeGraph {
    assert!(nodes >= 2, "a line needs two nodes");
    let step = end / (nodes - 1) as f64;
    let parents: Vec<_> = (0..nodes).map(|idx| idx.checked_sub(1)).collect();
    let positions: Vec<_> = (0..nodes)
        .map(|idx| Point3::new(step * idx as f64, 0.0, 0.0))
        .collect();
    tree_from_parents(&parents, &positions)
}

/// A perfectly balanced binary tree of the given depth hanging from a
/// one-edge stem, so the first branch point is not the root.
pub(crate) fn balanced_binary(depth: u32) -> TreeGraph {
    let mut parents = vec![None, Some(0)];
    let mut positions = vec![Point3::ORIGIN, Point3::new(0.0, 1.0, 0.0)];
    let mut frontier = vec![1_usize];
    for level in 0..depth {
        let spread = f64::from(1_u32 << (depth - level));
        let mut next = Vec::with_capacity(frontier.len() * 2);
        for &parent in &frontier {
            let base = positions[parent];
            for side in [-1.0, 1.0] {
                parents.push(Some(parent));
                positions.push(base + Point3::new(side * spread, 1.0, 0.0));
                next.push(positions.len() - 1);
            }
        }
        frontier = next;
    }
    tree_from_parents(&parents, &positions)
}

/// A primary path of `length` vertices along x (vertex 0 is the root) with a
/// single-vertex side branch attached at each index in `attachments`.
pub(crate) fn caterpillar(length: usize, attachments: &[usize]) -> TreeGraph {
    let mut parents: Vec<_> = (0..length).map(|idx| idx.checked_sub(1)).collect();
    let mut positions: Vec<_> = (0..length)
        .map(|idx| Point3::new(idx as f64, 0.0, 0.0))
        .collect();
    for &at in attachments {
        parents.push(Some(at));
        positions.push(Point3::new(at as f64, 1.0, 0.0));
    }
    tree_from_parents(&parents, &positions)
}

/// The "Y" used across suites: root stem to a branch point with two tips
/// of different length.
///
/// ```text
/// 0 (0,0,0) -> 1 (0,2,0) -> 2 (-3,6,0)
///                        -> 3 (1,3,0) -> 4 (2,4,0)
/// ```
pub(crate) fn fork() -> TreeGraph {
    tree_from_parents(
        &[None, Some(0), Some(1), Some(1), Some(3)],
        &[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(-3.0, 6.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
            Point3::new(2.0, 4.0, 0.0),
        ],
    )
}
