//! Elder-rule reduction of a tree into a persistence diagram.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::error::Result;
use crate::graph::{SimplifiedGraph, VertexId};
use crate::strahler::StrahlerOrders;

use super::survivor::SurvivorChain;
use super::{Descriptor, Landscape, LandscapeConfig};

/// One point of a persistence diagram.
///
/// `merge` is the vertex where the branch died (the root for the final
/// point) and `tip` the tip the branch was born at. Both refer to the graph
/// the diagram was computed for, not to its simplification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagramPoint {
    /// Descriptor value at the merge vertex.
    pub birth: f64,
    /// Descriptor value carried up from the branch's tip.
    pub death: f64,
    /// Vertex where the branch merged into an elder one.
    pub merge: VertexId,
    /// Tip that started the branch.
    pub tip: VertexId,
}

impl DiagramPoint {
    /// Bar length, `|death - birth|`.
    #[must_use]
    pub fn persistence(&self) -> f64 {
        (self.death - self.birth).abs()
    }
}

/// Persistence diagram of one descriptor over one tree: one point per tip.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistenceDiagram {
    descriptor: Descriptor,
    points: Vec<DiagramPoint>,
}

impl PersistenceDiagram {
    /// Runs the elder-rule reduction over `simplified`.
    ///
    /// Every tip opens a branch carrying its descriptor value. A vertex is
    /// merged once all of its children are open: the child carrying the
    /// largest value survives (ties go to the lowest vertex index) and each
    /// other child closes with the point `(value at merge, carried value)`.
    /// The merge vertex then carries the survivor's value upwards. The last
    /// point pairs the root's own value with the value that reached it.
    ///
    /// `orders` must classify `simplified.graph()` and is only used by
    /// [`Descriptor::Centrifugal`]; orders of any other size are rejected.
    ///
    /// # Errors
    /// Propagates [`Descriptor::evaluate`] failures.
    #[instrument(
        name = "persistence.diagram",
        err,
        skip_all,
        fields(descriptor = %descriptor, vertices = simplified.graph().len())
    )]
    pub fn compute(
        simplified: &SimplifiedGraph,
        descriptor: Descriptor,
        orders: Option<&StrahlerOrders>,
    ) -> Result<Self> {
        let graph = simplified.graph();
        let values = descriptor.evaluate(graph, orders)?;
        let mut carried = values.clone();
        let mut pending: Vec<usize> = graph
            .vertices()
            .map(|vertex| graph.out_degree(vertex))
            .collect();
        let mut chain = SurvivorChain::new(graph.len());
        let mut open: VecDeque<VertexId> = graph.tips().collect();
        let mut points = Vec::with_capacity(open.len());

        while let Some(vertex) = open.pop_front() {
            let Some(merge) = graph.parent(vertex) else {
                continue;
            };
            let remaining = &mut pending[merge.index()];
            *remaining -= 1;
            if *remaining > 0 {
                continue;
            }

            let children = graph.children(merge);
            let Some(survivor) = children.iter().copied().reduce(|elder, child| {
                if carried[child.index()] > carried[elder.index()] {
                    child
                } else {
                    elder
                }
            }) else {
                continue;
            };
            for &child in children.iter().filter(|&&child| child != survivor) {
                let tip = VertexId(chain.tip(child.index()));
                points.push(DiagramPoint {
                    birth: values[merge.index()],
                    death: carried[child.index()],
                    merge: simplified.origin(merge),
                    tip: simplified.origin(tip),
                });
            }
            carried[merge.index()] = carried[survivor.index()];
            chain.link(merge.index(), survivor.index());
            open.push_back(merge);
        }

        let root = graph.root();
        let tip = VertexId(chain.tip(root.index()));
        points.push(DiagramPoint {
            birth: values[root.index()],
            death: carried[root.index()],
            merge: simplified.origin(root),
            tip: simplified.origin(tip),
        });

        debug!(points = points.len(), "persistence diagram computed");
        Ok(Self { descriptor, points })
    }

    /// Descriptor the diagram was computed for.
    #[must_use]
    #[rustfmt::skip]
    pub fn descriptor(&self) -> Descriptor { self.descriptor }

    /// Points in emission order; the root's point comes last.
    #[must_use]
    #[rustfmt::skip]
    pub fn points(&self) -> &[DiagramPoint] { &self.points }

    /// Number of points, equal to the number of tips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: every tree contributes at least the root's point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(birth, death)` pairs.
    #[must_use]
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|point| (point.birth, point.death))
            .collect()
    }

    /// `(merge, tip)` vertex pairs matching [`PersistenceDiagram::pairs`].
    #[must_use]
    pub fn node_pairs(&self) -> Vec<(VertexId, VertexId)> {
        self.points
            .iter()
            .map(|point| (point.merge, point.tip))
            .collect()
    }

    /// Bar lengths matching [`PersistenceDiagram::pairs`].
    #[must_use]
    pub fn barcode(&self) -> Vec<f64> {
        self.points.iter().map(DiagramPoint::persistence).collect()
    }

    /// Persistence landscape of the diagram.
    #[must_use]
    pub fn landscape(&self, config: LandscapeConfig) -> Landscape {
        Landscape::from_diagram(&self.pairs(), config)
    }
}
