//! Construction and validation of [`TreeGraph`] instances.

use std::collections::HashMap;

use tracing::{instrument, warn};

use crate::error::GraphError;

use super::{NodeId, PathId, PathInfo, Point3, TreeGraph, Vertex, VertexId};

/// One input sample: identity, parent link, position, radius and path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeRecord {
    id: NodeId,
    parent: Option<NodeId>,
    position: Point3,
    radius: f64,
    path: Option<PathId>,
}

impl NodeRecord {
    /// Creates a record with unit radius and no path.
    #[must_use]
    pub const fn new(id: NodeId, parent: Option<NodeId>, position: Point3) -> Self {
        Self {
            id,
            parent,
            position,
            radius: 1.0,
            path: None,
        }
    }

    /// Overrides the radius.
    #[must_use]
    pub const fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Associates the record with a registered path.
    #[must_use]
    pub const fn with_path(mut self, path: PathId) -> Self {
        self.path = Some(path);
        self
    }

    /// Identity of the sample.
    #[must_use]
    #[rustfmt::skip]
    pub const fn id(&self) -> NodeId { self.id }

    /// Identity of the parent sample, `None` for the root.
    #[must_use]
    #[rustfmt::skip]
    pub const fn parent(&self) -> Option<NodeId> { self.parent }
}

/// Collects node records and paths, then validates them into a
/// [`TreeGraph`].
///
/// # Examples
/// ```
/// use ramify_core::{NodeId, NodeRecord, PathInfo, Point3, SwcType, TreeGraphBuilder};
///
/// let mut builder = TreeGraphBuilder::new();
/// let primary = builder.add_path(PathInfo::new(1, SwcType::Axon));
/// builder
///     .add_node(NodeRecord::new(NodeId(1), None, Point3::ORIGIN).with_path(primary))
///     .add_node(
///         NodeRecord::new(NodeId(2), Some(NodeId(1)), Point3::new(1.0, 0.0, 0.0))
///             .with_path(primary),
///     );
/// let graph = builder.build()?;
/// assert_eq!(graph.path(graph.root()).map(|p| p.order()), Some(1));
/// # Ok::<(), ramify_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct TreeGraphBuilder {
    records: Vec<NodeRecord>,
    paths: Vec<PathInfo>,
}

impl TreeGraphBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder with room for `nodes` records.
    #[must_use]
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            records: Vec::with_capacity(nodes),
            paths: Vec::new(),
        }
    }

    /// Registers a path and returns its identifier.
    pub fn add_path(&mut self, info: PathInfo) -> PathId {
        self.paths.push(info);
        PathId(self.paths.len() - 1)
    }

    /// Queues a node record.
    pub fn add_node(&mut self, record: NodeRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    /// Number of queued node records.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.records.len()
    }

    /// Validates the queued records and builds the graph. Edge weights are
    /// the Euclidean distances between parent and child positions.
    ///
    /// # Errors
    /// Returns [`GraphError::Empty`] without records,
    /// [`GraphError::DuplicateNodeId`], [`GraphError::UnknownParent`] or
    /// [`GraphError::UnknownPath`] for dangling references,
    /// [`GraphError::NonFiniteCoordinate`] for NaN or infinite input or an
    /// edge too long to represent, and
    /// [`GraphError::NoRoot`], [`GraphError::MultipleRoots`] or
    /// [`GraphError::Cycle`] when the records do not form one rooted tree.
    #[instrument(name = "graph.build", err, skip(self), fields(nodes = self.records.len(), paths = self.paths.len()))]
    pub fn build(self) -> Result<TreeGraph, GraphError> {
        let Self { records, paths } = self;
        if records.is_empty() {
            warn!("no node records, rejecting graph");
            return Err(GraphError::Empty);
        }

        let mut index = HashMap::with_capacity(records.len());
        let mut vertices = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if !record.position.is_finite() || !record.radius.is_finite() {
                warn!(id = %record.id, "non-finite coordinate or radius, rejecting graph");
                return Err(GraphError::NonFiniteCoordinate { id: record.id });
            }
            if let Some(path) = record.path
                && path.0 >= paths.len()
            {
                warn!(id = %record.id, path = path.0, "unknown path, rejecting graph");
                return Err(GraphError::UnknownPath {
                    id: record.id,
                    path: path.0,
                });
            }
            if index.insert(record.id, VertexId(idx)).is_some() {
                warn!(id = %record.id, "duplicate node id, rejecting graph");
                return Err(GraphError::DuplicateNodeId { id: record.id });
            }
            vertices.push(Vertex {
                id: record.id,
                position: record.position,
                radius: record.radius,
                path: record.path,
            });
        }

        let mut parents = Vec::with_capacity(records.len());
        let mut weights = Vec::with_capacity(records.len());
        for record in &records {
            let parent = match record.parent {
                None => None,
                Some(parent_id) => {
                    let Some(&parent) = index.get(&parent_id) else {
                        warn!(id = %record.id, parent = %parent_id, "unknown parent, rejecting graph");
                        return Err(GraphError::UnknownParent {
                            id: record.id,
                            parent: parent_id,
                        });
                    };
                    Some(parent)
                }
            };
            let weight = parent.map_or(0.0, |parent: VertexId| {
                vertices[parent.0].position.distance_to(record.position)
            });
            if !weight.is_finite() {
                warn!(id = %record.id, "edge weight overflows, rejecting graph");
                return Err(GraphError::NonFiniteCoordinate { id: record.id });
            }
            parents.push(parent);
            weights.push(weight);
        }

        TreeGraph::from_parts(vertices, parents, weights, paths)
    }
}
