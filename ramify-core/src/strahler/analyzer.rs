//! Cached per-order statistics over one graph.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use once_cell::unsync::OnceCell;
use tracing::warn;

use crate::error::{AnalysisError, Result};
use crate::graph::{TreeGraph, VertexId};

use super::branches::BranchSet;
use super::{Branch, OrderAggregates, StrahlerOrders};

/// Strahler analysis of a borrowed [`TreeGraph`].
///
/// Classification, aggregates and branches are each computed on first use
/// and cached for the lifetime of the analyser. Re-rooting or rescaling a
/// graph produces a new graph, which needs a new analyser.
///
/// # Examples
/// ```
/// use ramify_core::{NodeId, NodeRecord, Point3, StrahlerAnalyzer, TreeGraph};
///
/// // A stem splitting into two tips.
/// let graph = TreeGraph::from_records([
///     NodeRecord::new(NodeId(1), None, Point3::ORIGIN),
///     NodeRecord::new(NodeId(2), Some(NodeId(1)), Point3::new(0.0, 1.0, 0.0)),
///     NodeRecord::new(NodeId(3), Some(NodeId(2)), Point3::new(-1.0, 2.0, 0.0)),
///     NodeRecord::new(NodeId(4), Some(NodeId(2)), Point3::new(1.0, 2.0, 0.0)),
/// ])?;
/// let analyzer = StrahlerAnalyzer::new(&graph);
/// assert_eq!(analyzer.root_number()?, 2);
/// assert_eq!(analyzer.highest_branch_order()?, 2);
/// assert_eq!(analyzer.branch_counts()?.get(&1), Some(&2));
/// assert_eq!(analyzer.bifurcation_ratios()?.get(&1), Some(&2.0));
/// # Ok::<(), ramify_core::AnalysisError>(())
/// ```
#[derive(Debug)]
pub struct StrahlerAnalyzer<'g> {
    graph: &'g TreeGraph,
    orders: OnceCell<StrahlerOrders>,
    aggregates: OnceCell<OrderAggregates>,
    branches: OnceCell<BranchSet>,
}

impl<'g> StrahlerAnalyzer<'g> {
    /// Creates an analyser; nothing is computed until first queried.
    #[must_use]
    pub fn new(graph: &'g TreeGraph) -> Self {
        Self {
            graph,
            orders: OnceCell::new(),
            aggregates: OnceCell::new(),
            branches: OnceCell::new(),
        }
    }

    /// The analysed graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph(&self) -> &'g TreeGraph { self.graph }

    /// Order of every vertex.
    ///
    /// # Errors
    /// Propagates [`StrahlerOrders::classify`] failures.
    pub fn orders(&self) -> Result<&StrahlerOrders> {
        self.orders
            .get_or_try_init(|| StrahlerOrders::classify(self.graph))
    }

    /// Per-order vertex, branch-point and tip counts and cable length.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn aggregates(&self) -> Result<&OrderAggregates> {
        self.aggregates
            .get_or_try_init(|| Ok(OrderAggregates::compute(self.graph, self.orders()?)))
    }

    fn branch_set(&self) -> Result<&BranchSet> {
        self.branches
            .get_or_try_init(|| Ok(BranchSet::extract(self.graph, self.orders()?)))
    }

    /// Highest Strahler order, the order of the root.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn root_number(&self) -> Result<u32> {
        Ok(self.orders()?.root_number())
    }

    /// Highest order with at least one branch: the root number, or one less
    /// when the root's order has no branch (the root is itself a branch
    /// point).
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn highest_branch_order(&self) -> Result<u32> {
        let root_number = self.root_number()?;
        let branches = self.branch_set()?;
        Ok(if branches.of_order(root_number).is_empty() {
            root_number - 1
        } else {
            root_number
        })
    }

    /// Cable length per order.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn lengths(&self) -> Result<BTreeMap<u32, f64>> {
        let aggregates = self.aggregates()?;
        Ok(aggregates
            .orders()
            .map(|order| (order, aggregates.length(order)))
            .collect())
    }

    /// Number of branch points per order.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn branch_point_counts(&self) -> Result<BTreeMap<u32, usize>> {
        let aggregates = self.aggregates()?;
        Ok(aggregates
            .orders()
            .map(|order| (order, aggregates.branch_point_count(order)))
            .collect())
    }

    /// Number of branches per order, for every order up to the root number.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn branch_counts(&self) -> Result<BTreeMap<u32, usize>> {
        let branches = self.branch_set()?;
        Ok(self
            .all_orders()?
            .map(|order| (order, branches.of_order(order).len()))
            .collect())
    }

    /// Branches grouped by order, for every order up to the root number.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn branches_by_order(&self) -> Result<BTreeMap<u32, &[Branch]>> {
        let branches = self.branch_set()?;
        Ok(self
            .all_orders()?
            .map(|order| (order, branches.of_order(order)))
            .collect())
    }

    /// Branches of one order.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidOrder`] when `order` lies outside
    /// `1..=highest_branch_order()` and [`AnalysisError::EmptyOrder`] when the
    /// order has no branches.
    pub fn branches(&self, order: u32) -> Result<&[Branch]> {
        let highest = self.highest_branch_order()?;
        if !(1..=highest).contains(&order) {
            warn!(order, highest, "rejecting out-of-range branch order");
            return Err(AnalysisError::InvalidOrder { order, highest });
        }
        let branches = self.branch_set()?.of_order(order);
        if branches.is_empty() {
            warn!(order, "no branches of requested order");
            return Err(AnalysisError::EmptyOrder { order });
        }
        Ok(branches)
    }

    /// Ratio of branch counts between consecutive orders, keyed by the lower
    /// order. The highest branch order maps to `NaN`; a tree without branches
    /// yields an empty map.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn bifurcation_ratios(&self) -> Result<BTreeMap<u32, f64>> {
        let highest = self.highest_branch_order()?;
        if highest == 0 {
            return Ok(BTreeMap::new());
        }
        let branches = self.branch_set()?;
        let count = |order: u32| branches.of_order(order).len() as f64;
        let mut ratios: BTreeMap<u32, f64> = (2..=highest)
            .map(|order| (order - 1, count(order - 1) / count(order)))
            .collect();
        ratios.insert(highest, f64::NAN);
        Ok(ratios)
    }

    /// Mean of the defined bifurcation ratios, `NaN` when there are none.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn avg_bifurcation_ratio(&self) -> Result<f64> {
        Ok(mean(
            self.bifurcation_ratios()?
                .into_values()
                .filter(|ratio| !ratio.is_nan()),
        ))
    }

    /// Mean number of vertices per branch, per order. Orders without
    /// branches map to `NaN`.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn avg_fragmentations(&self) -> Result<BTreeMap<u32, f64>> {
        self.per_order(|branches| mean(branches.iter().map(|branch| branch.len() as f64)))
    }

    /// Mean contraction per order. Undefined contractions add nothing to the
    /// sum but still count towards the number of branches.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn avg_contractions(&self) -> Result<BTreeMap<u32, f64>> {
        self.per_order(|branches| {
            let total: f64 = branches
                .iter()
                .map(Branch::contraction)
                .filter(|contraction| !contraction.is_nan())
                .sum();
            total / branches.len() as f64
        })
    }

    /// Mean angle, in degrees, between each branch's fitted direction and
    /// that of the branch it grows from. Branches without a parent branch or
    /// without a defined direction are skipped; `NaN` when no angle remains.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn avg_extension_angles(&self) -> Result<BTreeMap<u32, f64>> {
        let set = self.branch_set()?;
        self.per_order(|branches| {
            mean(
                branches
                    .iter()
                    .filter_map(|branch| set.parent_of(branch).map(|parent| branch.angle_to(parent)))
                    .filter(|angle| !angle.is_nan()),
            )
        })
    }

    /// Vertices grouped by order, in arena order within each group.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn nodes_by_order(&self) -> Result<BTreeMap<u32, Vec<VertexId>>> {
        let orders = self.orders()?;
        let mut grouped: BTreeMap<u32, Vec<VertexId>> = BTreeMap::new();
        for vertex in self.graph.vertices() {
            grouped.entry(orders.order(vertex)).or_default().push(vertex);
        }
        Ok(grouped)
    }

    /// Branches whose root-side endpoint is the tree root, lowest order first.
    ///
    /// # Errors
    /// Propagates classification failures.
    pub fn root_associated_branches(&self) -> Result<Vec<&Branch>> {
        let highest = self.highest_branch_order()?;
        let branches = self.branch_set()?;
        let root = self.graph.root();
        Ok((1..=highest)
            .flat_map(|order| branches.of_order(order))
            .filter(|branch| branch.root_side() == root)
            .collect())
    }

    fn all_orders(&self) -> Result<RangeInclusive<u32>> {
        Ok(1..=self.root_number()?)
    }

    fn per_order(
        &self,
        statistic: impl Fn(&[Branch]) -> f64,
    ) -> Result<BTreeMap<u32, f64>> {
        let branches = self.branch_set()?;
        Ok(self
            .all_orders()?
            .map(|order| (order, statistic(branches.of_order(order))))
            .collect())
    }
}

/// Arithmetic mean, `NaN` for an empty sequence.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
