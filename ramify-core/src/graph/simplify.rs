//! Topological simplification: collapse unbranched runs into single edges.

use tracing::instrument;

use crate::error::GraphError;

use super::{TreeGraph, VertexId};

/// A tree reduced to its root, branch points and tips.
///
/// Each edge carries the summed weight of the run of edges it replaces, so
/// geodesic distances between the kept vertices are preserved. Kept vertices
/// appear in the same relative order as in the source graph.
#[derive(Clone, Debug)]
pub struct SimplifiedGraph {
    graph: TreeGraph,
    origin: Vec<VertexId>,
}

impl SimplifiedGraph {
    /// The simplified tree.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph(&self) -> &TreeGraph { &self.graph }

    /// Maps a vertex of the simplified tree back to the source graph.
    #[must_use]
    pub fn origin(&self, vertex: VertexId) -> VertexId {
        self.origin[vertex.0]
    }
}

impl TreeGraph {
    /// Returns a copy keeping only the root, branch points and tips.
    ///
    /// # Errors
    /// Returns [`GraphError`] only if the source graph was itself invalid,
    /// which [`crate::TreeGraphBuilder`] rules out.
    ///
    /// # Examples
    /// ```
    /// use ramify_core::{NodeId, NodeRecord, Point3, TreeGraph};
    ///
    /// let graph = TreeGraph::from_records((0..5).map(|i| {
    ///     let parent = (i > 0).then(|| NodeId(i - 1));
    ///     NodeRecord::new(NodeId(i), parent, Point3::new(i as f64, 0.0, 0.0))
    /// }))?;
    /// let simplified = graph.simplified()?;
    /// assert_eq!(simplified.graph().len(), 2);
    /// assert_eq!(simplified.graph().sum_edge_weights(), 4.0);
    /// # Ok::<(), ramify_core::GraphError>(())
    /// ```
    #[instrument(name = "graph.simplify", err, skip(self), fields(vertices = self.len()))]
    pub fn simplified(&self) -> Result<SimplifiedGraph, GraphError> {
        let keep = |vertex: VertexId| {
            vertex == self.root || self.is_tip(vertex) || self.is_branch_point(vertex)
        };

        let mut remap = vec![None; self.len()];
        let mut origin = Vec::new();
        for vertex in self.vertices().filter(|&vertex| keep(vertex)) {
            remap[vertex.0] = Some(VertexId(origin.len()));
            origin.push(vertex);
        }

        let mut vertices = Vec::with_capacity(origin.len());
        let mut parents = Vec::with_capacity(origin.len());
        let mut weights = Vec::with_capacity(origin.len());
        for &source in &origin {
            vertices.push(*self.vertex(source));
            let mut weight = 0.0;
            let mut current = source;
            let mut ancestor = None;
            while let Some(parent) = self.parent(current) {
                weight += self.incoming_weight(current);
                if let Some(mapped) = remap[parent.0] {
                    ancestor = Some(mapped);
                    break;
                }
                current = parent;
            }
            parents.push(ancestor);
            weights.push(weight);
        }

        let graph = Self::from_parts(vertices, parents, weights, self.paths.clone())?;
        Ok(SimplifiedGraph { graph, origin })
    }
}
