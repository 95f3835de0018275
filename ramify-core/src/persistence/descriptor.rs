//! Scalar descriptor functions that drive the persistence filtration.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::{AnalysisError, Result};
use crate::graph::{Point3, TreeGraph};
use crate::strahler::StrahlerOrders;

/// A scalar function over tree vertices.
///
/// # Examples
/// ```
/// use ramify_core::Descriptor;
///
/// assert_eq!("Geodesic".parse::<Descriptor>()?, Descriptor::Geodesic);
/// assert_eq!(Descriptor::PathOrder.as_str(), "path-order");
/// assert!("depth".parse::<Descriptor>().is_err());
/// # Ok::<(), ramify_core::AnalysisError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Descriptor {
    /// Cable distance from the root.
    Geodesic = 0,
    /// Straight-line distance from the root.
    Radial = 1,
    /// Reversed Strahler order: 1 at the root, growing towards the tips.
    Centrifugal = 2,
    /// Order of the path the vertex was traced on.
    PathOrder = 3,
    /// X coordinate.
    X = 4,
    /// Y coordinate.
    Y = 5,
    /// Z coordinate.
    Z = 6,
}

impl Descriptor {
    /// Number of supported descriptors.
    pub const COUNT: usize = 7;

    /// Every supported descriptor, in canonical order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Geodesic,
        Self::Radial,
        Self::Centrifugal,
        Self::PathOrder,
        Self::X,
        Self::Y,
        Self::Z,
    ];

    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Geodesic => "geodesic",
            Self::Radial => "radial",
            Self::Centrifugal => "centrifugal",
            Self::PathOrder => "path-order",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    fn supported() -> String {
        Self::ALL
            .iter()
            .map(|descriptor| descriptor.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Evaluates the descriptor at every vertex of `graph`, indexed by
    /// [`crate::VertexId::index`].
    ///
    /// `orders` is only consulted by [`Descriptor::Centrifugal`]; when it is
    /// `None` the graph is classified on the fly.
    ///
    /// # Errors
    /// Returns [`AnalysisError::MissingPath`] when [`Descriptor::PathOrder`]
    /// meets a vertex without a path, [`AnalysisError::MismatchedOrders`]
    /// when `orders` classifies a graph of a different size, and propagates
    /// classification failures.
    pub fn evaluate(self, graph: &TreeGraph, orders: Option<&StrahlerOrders>) -> Result<Vec<f64>> {
        let coordinate = |pick: fn(Point3) -> f64| -> Vec<f64> {
            graph
                .vertices()
                .map(|vertex| pick(graph.position(vertex)))
                .collect()
        };
        let values = match self {
            Self::Geodesic => {
                let mut distance = vec![0.0; graph.len()];
                for &vertex in graph.topological_order() {
                    if let Some(parent) = graph.parent(vertex) {
                        distance[vertex.index()] =
                            distance[parent.index()] + graph.incoming_weight(vertex);
                    }
                }
                distance
            }
            Self::Radial => {
                let root = graph.position(graph.root());
                graph
                    .vertices()
                    .map(|vertex| graph.position(vertex).distance_to(root))
                    .collect()
            }
            Self::Centrifugal => {
                let owned;
                let orders = match orders {
                    Some(orders) if orders.as_slice().len() != graph.len() => {
                        let (expected, got) = (graph.len(), orders.as_slice().len());
                        warn!(expected, got, "orders do not match the graph");
                        return Err(AnalysisError::MismatchedOrders { expected, got });
                    }
                    Some(orders) => orders,
                    None => {
                        owned = StrahlerOrders::classify(graph)?;
                        &owned
                    }
                };
                graph
                    .vertices()
                    .map(|vertex| f64::from(orders.reversed(vertex)))
                    .collect()
            }
            Self::PathOrder => graph
                .vertices()
                .map(|vertex| {
                    graph
                        .path(vertex)
                        .map(|path| f64::from(path.order()))
                        .ok_or_else(|| {
                            let id = graph.vertex(vertex).id();
                            warn!(%id, "path-order descriptor needs a path on every vertex");
                            AnalysisError::MissingPath { id }
                        })
                })
                .collect::<Result<_>>()?,
            Self::X => coordinate(|point| point.x),
            Self::Y => coordinate(|point| point.y),
            Self::Z => coordinate(|point| point.z),
        };
        Ok(values)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Descriptor {
    type Err = AnalysisError;

    /// Parses a canonical name, ignoring ASCII case and surrounding
    /// whitespace. `"path order"` is accepted as a spelling of `path-order`.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("path order") {
            return Ok(Self::PathOrder);
        }
        Self::ALL
            .into_iter()
            .find(|descriptor| descriptor.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                warn!(name = %s, "unknown descriptor");
                AnalysisError::UnknownDescriptor {
                    name: s.to_owned(),
                    supported: Self::supported(),
                }
            })
    }
}
