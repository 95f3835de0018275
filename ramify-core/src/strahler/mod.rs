//! Horton-Strahler classification of tree vertices.
//!
//! Orders are assigned bottom-up: tips are order 1, a vertex with a single
//! child inherits that child's order, and a branch point takes the maximum
//! order of its children, plus one when that maximum is shared by two or
//! more children. The root carries the highest order, the *root number*.
//!
//! Classification runs as an explicit worklist seeded with the tips. Each
//! vertex tracks how many of its children are still unclassified and joins
//! the worklist once that count reaches zero, so the result never depends on
//! the order vertices happen to be stored in.
//!
//! [`StrahlerAnalyzer`] layers per-order aggregates and reconstructed
//! [`Branch`]es on top of the raw [`StrahlerOrders`].

mod analyzer;
mod branches;

use std::cmp::Ordering;

use tracing::{debug, instrument, warn};

use crate::error::{AnalysisError, Result};
use crate::graph::{TreeGraph, VertexId};

pub use self::analyzer::StrahlerAnalyzer;
pub use self::branches::Branch;

/// Strahler order of every vertex of one graph, indexed by [`VertexId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrahlerOrders {
    orders: Vec<u32>,
    root_number: u32,
}

impl StrahlerOrders {
    /// Classifies every vertex of `graph`.
    ///
    /// # Errors
    /// Returns [`AnalysisError::UnclassifiedVertex`] when a vertex is never
    /// reached from the tips, which a validated [`TreeGraph`] rules out.
    ///
    /// # Examples
    /// ```
    /// use ramify_core::{NodeId, NodeRecord, Point3, StrahlerOrders, TreeGraph};
    ///
    /// let graph = TreeGraph::from_records([
    ///     NodeRecord::new(NodeId(1), None, Point3::ORIGIN),
    ///     NodeRecord::new(NodeId(2), Some(NodeId(1)), Point3::new(-1.0, 1.0, 0.0)),
    ///     NodeRecord::new(NodeId(3), Some(NodeId(1)), Point3::new(1.0, 1.0, 0.0)),
    /// ])?;
    /// let orders = StrahlerOrders::classify(&graph)?;
    /// assert_eq!(orders.root_number(), 2);
    /// assert_eq!(orders.order(graph.root()), 2);
    /// # Ok::<(), ramify_core::AnalysisError>(())
    /// ```
    #[instrument(name = "strahler.classify", err, skip(graph), fields(vertices = graph.len()))]
    pub fn classify(graph: &TreeGraph) -> Result<Self> {
        let mut pending: Vec<usize> = graph
            .vertices()
            .map(|vertex| graph.out_degree(vertex))
            .collect();
        let mut assigned: Vec<Option<u32>> = vec![None; graph.len()];
        let mut worklist: Vec<VertexId> = graph.tips().collect();

        while let Some(vertex) = worklist.pop() {
            let child_orders = graph
                .children(vertex)
                .iter()
                .filter_map(|child| assigned[child.index()]);
            let order = combine(child_orders);
            assigned[vertex.index()] = Some(order);

            if let Some(parent) = graph.parent(vertex) {
                let remaining = &mut pending[parent.index()];
                *remaining -= 1;
                if *remaining == 0 {
                    worklist.push(parent);
                }
            }
        }

        let unclassified = assigned.iter().filter(|order| order.is_none()).count();
        if let Some(idx) = assigned.iter().position(Option::is_none) {
            let id = graph.vertex(VertexId(idx)).id();
            warn!(%id, remaining = unclassified, "vertex left without a Strahler order");
            return Err(AnalysisError::UnclassifiedVertex {
                id,
                remaining: unclassified,
            });
        }

        let orders: Vec<u32> = assigned.into_iter().flatten().collect();
        let root_number = orders[graph.root().index()];
        debug!(root_number, "strahler orders assigned");
        Ok(Self {
            orders,
            root_number,
        })
    }

    /// Highest order in the tree, which is always the order of the root.
    #[must_use]
    #[rustfmt::skip]
    pub fn root_number(&self) -> u32 { self.root_number }

    /// Order of `vertex`.
    #[must_use]
    pub fn order(&self, vertex: VertexId) -> u32 {
        self.orders[vertex.index()]
    }

    /// Centrifugal order of `vertex`: 1 at the root, increasing towards the
    /// tips.
    #[must_use]
    pub fn reversed(&self, vertex: VertexId) -> u32 {
        self.root_number - self.order(vertex) + 1
    }

    /// Orders indexed by [`VertexId::index`].
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.orders
    }
}

/// Order of a vertex given the orders of its children.
fn combine(children: impl Iterator<Item = u32>) -> u32 {
    let mut highest = 0;
    let mut ties = 0_usize;
    for order in children {
        match order.cmp(&highest) {
            Ordering::Greater => {
                highest = order;
                ties = 1;
            }
            Ordering::Equal => ties += 1,
            Ordering::Less => {}
        }
    }
    match ties {
        0 => 1,
        1 => highest,
        _ => highest + 1,
    }
}

/// Totals for one Strahler order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct OrderTotals {
    vertices: usize,
    branch_points: usize,
    tips: usize,
    length: f64,
}

/// Per-order vertex, branch-point and tip counts plus cable length.
///
/// Cable length of an order sums the weights of edges whose two endpoints
/// both carry that order; edges that cross between orders belong to none.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderAggregates {
    totals: Vec<OrderTotals>,
}

impl OrderAggregates {
    /// Aggregates `orders` over `graph` in a single pass.
    #[must_use]
    pub fn compute(graph: &TreeGraph, orders: &StrahlerOrders) -> Self {
        let mut totals = vec![OrderTotals::default(); orders.root_number() as usize];
        for vertex in graph.vertices() {
            let order = orders.order(vertex);
            let slot = &mut totals[slot_index(order)];
            slot.vertices += 1;
            if graph.is_branch_point(vertex) {
                slot.branch_points += 1;
            }
            if graph.is_tip(vertex) {
                slot.tips += 1;
            }
            if let Some(parent) = graph.parent(vertex)
                && orders.order(parent) == order
            {
                slot.length += graph.incoming_weight(vertex);
            }
        }
        Self { totals }
    }

    /// Orders covered, from 1 to the root number.
    pub fn orders(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=self.totals.len()).filter_map(|order| u32::try_from(order).ok())
    }

    /// Number of vertices of `order`.
    #[must_use]
    pub fn vertex_count(&self, order: u32) -> usize {
        self.get(order).map_or(0, |totals| totals.vertices)
    }

    /// Number of branch points of `order`.
    #[must_use]
    pub fn branch_point_count(&self, order: u32) -> usize {
        self.get(order).map_or(0, |totals| totals.branch_points)
    }

    /// Number of tips of `order`. Only order 1 has tips.
    #[must_use]
    pub fn tip_count(&self, order: u32) -> usize {
        self.get(order).map_or(0, |totals| totals.tips)
    }

    /// Cable length of `order`.
    #[must_use]
    pub fn length(&self, order: u32) -> f64 {
        self.get(order).map_or(0.0, |totals| totals.length)
    }

    fn get(&self, order: u32) -> Option<&OrderTotals> {
        order
            .checked_sub(1)
            .and_then(|idx| self.totals.get(idx as usize))
    }
}

fn slot_index(order: u32) -> usize {
    (order as usize).saturating_sub(1)
}

#[cfg(test)]
mod tests;
