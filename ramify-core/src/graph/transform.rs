//! Whole-graph transforms that produce new graphs: re-rooting and spatial
//! calibration. Analysers borrow a graph, so a transformed graph always
//! starts with empty analysis caches.

use std::collections::VecDeque;

use tracing::{instrument, warn};

use crate::error::GraphError;

use super::{NodeId, TreeGraph, Vertex, VertexId};

impl TreeGraph {
    /// Returns a copy whose edges are re-oriented so that `new_root` becomes
    /// the root. Edge weights travel with their edges.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownNode`] when `new_root` is not in the graph.
    ///
    /// # Examples
    /// ```
    /// use ramify_core::{NodeId, NodeRecord, Point3, TreeGraph};
    ///
    /// let graph = TreeGraph::from_records([
    ///     NodeRecord::new(NodeId(1), None, Point3::ORIGIN),
    ///     NodeRecord::new(NodeId(2), Some(NodeId(1)), Point3::new(1.0, 0.0, 0.0)),
    ///     NodeRecord::new(NodeId(3), Some(NodeId(1)), Point3::new(0.0, 1.0, 0.0)),
    /// ])?;
    /// let rerooted = graph.rerooted(NodeId(2))?;
    /// assert_eq!(rerooted.vertex(rerooted.root()).id(), NodeId(2));
    /// assert_eq!(rerooted.tips().count(), 1);
    /// # Ok::<(), ramify_core::GraphError>(())
    /// ```
    #[instrument(name = "graph.reroot", err, skip(self), fields(new_root = %new_root))]
    pub fn rerooted(&self, new_root: NodeId) -> Result<Self, GraphError> {
        let Some(start) = self.by_node_id(new_root) else {
            warn!(id = %new_root, "unknown node, cannot reroot");
            return Err(GraphError::UnknownNode { id: new_root });
        };

        let mut parents: Vec<Option<VertexId>> = vec![None; self.len()];
        let mut weights = vec![0.0; self.len()];
        let mut seen = vec![false; self.len()];
        let mut queue = VecDeque::from([start]);
        seen[start.0] = true;
        while let Some(vertex) = queue.pop_front() {
            let upward = self.parent(vertex).map(|parent| (parent, self.incoming_weight(vertex)));
            let downward = self
                .children(vertex)
                .iter()
                .map(|&child| (child, self.incoming_weight(child)));
            for (neighbour, weight) in downward.chain(upward) {
                if seen[neighbour.0] {
                    continue;
                }
                seen[neighbour.0] = true;
                parents[neighbour.0] = Some(vertex);
                weights[neighbour.0] = weight;
                queue.push_back(neighbour);
            }
        }

        Self::from_parts(self.vertices.clone(), parents, weights, self.paths.clone())
    }

    /// Returns a copy with every coordinate multiplied by the given factors
    /// and edge weights recomputed from the scaled positions.
    ///
    /// # Errors
    /// Returns [`GraphError::NonFiniteCoordinate`] when scaling produces a
    /// non-finite coordinate or edge weight.
    pub fn scaled(&self, x: f64, y: f64, z: f64) -> Result<Self, GraphError> {
        let mut vertices: Vec<Vertex> = Vec::with_capacity(self.len());
        for vertex in &self.vertices {
            let position = vertex.position.scaled(x, y, z);
            if !position.is_finite() {
                warn!(id = %vertex.id, "scaled coordinate overflows");
                return Err(GraphError::NonFiniteCoordinate { id: vertex.id });
            }
            vertices.push(Vertex { position, ..*vertex });
        }
        let mut weights = Vec::with_capacity(vertices.len());
        for (parent, vertex) in self.parents.iter().zip(&vertices) {
            let weight = parent.map_or(0.0, |parent| {
                vertices[parent.0].position.distance_to(vertex.position)
            });
            if !weight.is_finite() {
                warn!(id = %vertex.id, "scaled edge weight overflows");
                return Err(GraphError::NonFiniteCoordinate { id: vertex.id });
            }
            weights.push(weight);
        }

        Self::from_parts(vertices, self.parents.clone(), weights, self.paths.clone())
    }
}
