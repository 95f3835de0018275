//! Branch reconstruction from a classified tree.
//!
//! A branch is one Strahler stream: it starts at a tip, or at a branch point
//! none of whose children shares its order, and follows same-order ancestors
//! towards the root. It ends at the first ancestor of a different order,
//! which is kept as the branch's root-side endpoint, or at the root itself.
//! Every vertex except possibly the root therefore lies strictly inside
//! exactly one branch.

use tracing::{debug, instrument};

use crate::graph::{PathId, Point3, TreeGraph, VertexId};

use super::StrahlerOrders;

/// Power iterations used to fit a branch direction.
const FIT_ITERATIONS: usize = 64;

/// A run of vertices of one Strahler order, ordered from the root side to
/// the tip side.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    order: u32,
    path: Option<PathId>,
    vertices: Vec<VertexId>,
    points: Vec<Point3>,
    direction: Option<Point3>,
}

impl Branch {
    fn new(order: u32, path: Option<PathId>, vertices: Vec<VertexId>, points: Vec<Point3>) -> Self {
        let direction = fit_direction(&points);
        Self {
            order,
            path,
            vertices,
            points,
            direction,
        }
    }

    /// Strahler order of the branch's tip-side vertex.
    #[must_use]
    #[rustfmt::skip]
    pub fn order(&self) -> u32 { self.order }

    /// Path of the tip-side vertex, if it has one.
    #[must_use]
    #[rustfmt::skip]
    pub fn path(&self) -> Option<PathId> { self.path }

    /// Vertices from the root side to the tip side.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertices(&self) -> &[VertexId] { &self.vertices }

    /// Positions matching [`Branch::vertices`].
    #[must_use]
    #[rustfmt::skip]
    pub fn points(&self) -> &[Point3] { &self.points }

    /// Number of vertices, endpoints included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false`: extracted branches hold at least two vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Root-side endpoint.
    #[must_use]
    pub fn root_side(&self) -> VertexId {
        self.vertices[0]
    }

    /// Tip-side endpoint, where the stream starts.
    #[must_use]
    pub fn tip_side(&self) -> VertexId {
        self.vertices[self.vertices.len() - 1]
    }

    /// Summed length of the branch's segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(pair[1]))
            .sum()
    }

    /// Straight-line distance between the two endpoints.
    #[must_use]
    pub fn end_to_end(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first.distance_to(*last),
            _ => 0.0,
        }
    }

    /// End-to-end distance over length, in `(0, 1]`; `NaN` for a branch of
    /// zero length.
    #[must_use]
    pub fn contraction(&self) -> f64 {
        self.end_to_end() / self.length()
    }

    /// Unit vector along the principal axis of the branch's points, oriented
    /// from the root side to the tip side.
    ///
    /// Falls back to the chord between the endpoints when the point cloud has
    /// no dominant axis. Returns `None` when all points coincide. The fit runs
    /// once, when the branch is extracted.
    #[must_use]
    #[rustfmt::skip]
    pub fn fitted_direction(&self) -> Option<Point3> { self.direction }

    /// Angle in degrees between the fitted directions of two branches, in
    /// `[0, 180]`. `NaN` when either direction is undefined.
    #[must_use]
    pub fn angle_to(&self, other: &Self) -> f64 {
        match (self.fitted_direction(), other.fitted_direction()) {
            (Some(a), Some(b)) => a.dot(b).clamp(-1.0, 1.0).acos().to_degrees(),
            _ => f64::NAN,
        }
    }
}

fn fit_direction(points: &[Point3]) -> Option<Point3> {
    let (&first, &last) = (points.first()?, points.last()?);
    let chord = last - first;
    let axis = principal_axis(points, chord).or_else(|| chord.normalized())?;
    Some(if axis.dot(chord) < 0.0 { axis * -1.0 } else { axis })
}

/// Dominant eigenvector of the points' covariance matrix.
fn principal_axis(points: &[Point3], seed: Point3) -> Option<Point3> {
    if points.len() < 2 {
        return None;
    }
    let count = points.len() as f64;
    let centroid = points
        .iter()
        .fold(Point3::ORIGIN, |acc, &point| acc + point)
        * (1.0 / count);

    let mut cov = [[0.0_f64; 3]; 3];
    for &point in points {
        let d = point - centroid;
        let d = [d.x, d.y, d.z];
        for (row, &a) in cov.iter_mut().zip(&d) {
            for (cell, &b) in row.iter_mut().zip(&d) {
                *cell += a * b;
            }
        }
    }

    let mut axis = seed.normalized().unwrap_or(Point3::new(1.0, 1.0, 1.0));
    for _ in 0..FIT_ITERATIONS {
        let next = Point3::new(
            cov[0][0] * axis.x + cov[0][1] * axis.y + cov[0][2] * axis.z,
            cov[1][0] * axis.x + cov[1][1] * axis.y + cov[1][2] * axis.z,
            cov[2][0] * axis.x + cov[2][1] * axis.y + cov[2][2] * axis.z,
        );
        axis = next.normalized()?;
    }
    Some(axis)
}

/// Branches of one classified graph, grouped by order.
#[derive(Clone, Debug, Default)]
pub(super) struct BranchSet {
    by_order: Vec<Vec<Branch>>,
    /// For every vertex, the branch holding it strictly after its root-side
    /// endpoint, as `(order slot, index)`.
    owner: Vec<Option<(usize, usize)>>,
}

impl BranchSet {
    #[instrument(name = "strahler.branches", skip_all, fields(vertices = graph.len()))]
    pub(super) fn extract(graph: &TreeGraph, orders: &StrahlerOrders) -> Self {
        let mut by_order: Vec<Vec<Branch>> = vec![Vec::new(); orders.root_number() as usize];
        let mut owner = vec![None; graph.len()];

        let is_head = |vertex: VertexId| {
            graph.is_tip(vertex)
                || (graph.is_branch_point(vertex)
                    && graph
                        .children(vertex)
                        .iter()
                        .all(|&child| orders.order(child) != orders.order(vertex)))
        };

        for head in graph.vertices().filter(|&vertex| is_head(vertex)) {
            let order = orders.order(head);
            let mut chain = vec![head];
            let mut current = head;
            while let Some(parent) = graph.parent(current) {
                chain.push(parent);
                if orders.order(parent) != order {
                    break;
                }
                current = parent;
            }
            if chain.len() < 2 {
                continue;
            }
            chain.reverse();

            let slot = order as usize - 1;
            let index = by_order[slot].len();
            for &inner in &chain[1..] {
                owner[inner.index()] = Some((slot, index));
            }
            let points = chain.iter().map(|&vertex| graph.position(vertex)).collect();
            by_order[slot].push(Branch::new(order, graph.vertex(head).path(), chain, points));
        }

        debug!(
            branches = by_order.iter().map(Vec::len).sum::<usize>(),
            "branches extracted"
        );
        Self { by_order, owner }
    }

    /// Branches of `order`; empty for orders outside the tree.
    pub(super) fn of_order(&self, order: u32) -> &[Branch] {
        order
            .checked_sub(1)
            .and_then(|slot| self.by_order.get(slot as usize))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The branch that continues rootward from `branch`, if any.
    pub(super) fn parent_of(&self, branch: &Branch) -> Option<&Branch> {
        let (slot, index) = self.owner[branch.root_side().index()]?;
        self.by_order.get(slot)?.get(index)
    }
}
