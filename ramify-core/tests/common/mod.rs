//! Tree fixtures shared by the integration suites.
#![allow(dead_code, reason = "each suite uses a different subset of the fixtures")]

use proptest::prelude::*;
use ramify_core::{NodeId, NodeRecord, Point3, TreeGraph};

/// Node records for a parent table; node ids are the indices.
pub fn records(parents: &[Option<usize>], positions: &[Point3]) -> Vec<NodeRecord> {
    parents
        .iter()
        .zip(positions)
        .enumerate()
        .map(|(idx, (parent, position))| {
            NodeRecord::new(id(idx), parent.map(id), *position)
        })
        .collect()
}

pub fn id(idx: usize) -> NodeId {
    NodeId(idx as u64)
}

/// A stem from the origin to `(0, 1, 0)` that splits into two tips.
pub fn y_shape() -> TreeGraph {
    TreeGraph::from_records(records(
        &[None, Some(0), Some(1), Some(1)],
        &[
            Point3::ORIGIN,
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 2.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
        ],
    ))
    .expect("valid tree")
}

/// `n` nodes evenly spaced from the origin to `(length, 0, 0)`.
pub fn line(n: usize, length: f64) -> TreeGraph {
    let step = length / (n - 1) as f64;
    let parents: Vec<_> = (0..n).map(|idx| idx.checked_sub(1)).collect();
    let positions: Vec<_> = (0..n)
        .map(|idx| Point3::new(idx as f64 * step, 0.0, 0.0))
        .collect();
    TreeGraph::from_records(records(&parents, &positions)).expect("valid tree")
}

/// A random tree description: every node after the first picks an earlier
/// node as parent, and positions are drawn from a cube.
#[derive(Clone, Debug)]
pub struct TreeSpec {
    pub parents: Vec<Option<usize>>,
    pub positions: Vec<Point3>,
}

impl TreeSpec {
    pub fn graph(&self) -> TreeGraph {
        TreeGraph::from_records(records(&self.parents, &self.positions)).expect("valid tree")
    }

    /// Same tree with its records stored in a different order.
    pub fn permuted_graph(&self, rotation: usize) -> TreeGraph {
        let mut shuffled = records(&self.parents, &self.positions);
        let len = shuffled.len();
        shuffled.rotate_left(rotation % len);
        shuffled.reverse();
        TreeGraph::from_records(shuffled).expect("valid tree")
    }
}

fn point() -> impl Strategy<Value = Point3> {
    (-100.0..100.0_f64, -100.0..100.0_f64, -100.0..100.0_f64)
        .prop_map(|(x, y, z)| Point3::new(x, y, z))
}

/// Random trees with between 1 and `max_nodes` nodes.
pub fn tree_spec(max_nodes: usize) -> impl Strategy<Value = TreeSpec> {
    (1..=max_nodes).prop_flat_map(|n| {
        let parents = (0..n)
            .map(|idx| {
                if idx == 0 {
                    Just(None).boxed()
                } else {
                    (0..idx).prop_map(Some).boxed()
                }
            })
            .collect::<Vec<_>>();
        (parents, prop::collection::vec(point(), n))
            .prop_map(|(parents, positions)| TreeSpec { parents, positions })
    })
}
