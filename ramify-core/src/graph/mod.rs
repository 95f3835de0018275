//! Rooted, edge-weighted tree graphs of traced reconstructions.
//!
//! A [`TreeGraph`] stores its vertices in an arena addressed by dense
//! [`VertexId`] indices. Every vertex except the root has exactly one parent,
//! and every edge is directed from parent to child and weighted by the
//! Euclidean distance between its endpoints. These invariants are checked once
//! by [`TreeGraphBuilder::build`]; analysers rely on them and never mutate the
//! graph, so one graph can back any number of analyses.

mod builder;
mod path;
mod point;
mod simplify;
mod transform;

use std::{collections::HashMap, collections::VecDeque, fmt};

use tracing::{debug, warn};

use crate::error::GraphError;

pub use self::builder::{NodeRecord, TreeGraphBuilder};
pub use self::path::{PathId, PathInfo, SwcType};
pub use self::point::Point3;
pub use self::simplify::SimplifiedGraph;

/// Stable external identity of a vertex, such as an SWC sample number.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense index of a vertex inside one [`TreeGraph`].
///
/// Indices are only meaningful for the graph that produced them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    /// Returns the arena index.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index(self) -> usize { self.0 }
}

/// A sampled point of the reconstruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    id: NodeId,
    position: Point3,
    radius: f64,
    path: Option<PathId>,
}

impl Vertex {
    /// Stable identity of the vertex.
    #[must_use]
    #[rustfmt::skip]
    pub const fn id(&self) -> NodeId { self.id }

    /// Position of the vertex.
    #[must_use]
    #[rustfmt::skip]
    pub const fn position(&self) -> Point3 { self.position }

    /// Radius of the reconstruction at this vertex.
    #[must_use]
    #[rustfmt::skip]
    pub const fn radius(&self) -> f64 { self.radius }

    /// Path the vertex was sampled from, if any.
    #[must_use]
    #[rustfmt::skip]
    pub const fn path(&self) -> Option<PathId> { self.path }
}

/// A validated, singly rooted, acyclic tree.
///
/// # Examples
/// ```
/// use ramify_core::{NodeId, NodeRecord, Point3, TreeGraph};
///
/// let graph = TreeGraph::from_records([
///     NodeRecord::new(NodeId(1), None, Point3::new(0.0, 0.0, 0.0)),
///     NodeRecord::new(NodeId(2), Some(NodeId(1)), Point3::new(3.0, 4.0, 0.0)),
/// ])?;
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.tips().count(), 1);
/// assert_eq!(graph.sum_edge_weights(), 5.0);
/// # Ok::<(), ramify_core::GraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct TreeGraph {
    vertices: Vec<Vertex>,
    parents: Vec<Option<VertexId>>,
    children: Vec<Vec<VertexId>>,
    weights: Vec<f64>,
    paths: Vec<PathInfo>,
    root: VertexId,
    breadth_first: Vec<VertexId>,
    index: HashMap<NodeId, VertexId>,
}

impl TreeGraph {
    /// Builds a graph from node records without any registered paths.
    ///
    /// # Errors
    /// Returns [`GraphError`] when the records do not describe exactly one
    /// rooted tree.
    pub fn from_records(
        records: impl IntoIterator<Item = NodeRecord>,
    ) -> Result<Self, GraphError> {
        let mut builder = TreeGraphBuilder::new();
        for record in records {
            builder.add_node(record);
        }
        builder.build()
    }

    /// Assembles a graph from per-vertex parents and incoming edge weights,
    /// checking the single-root and acyclicity invariants.
    pub(crate) fn from_parts(
        vertices: Vec<Vertex>,
        parents: Vec<Option<VertexId>>,
        weights: Vec<f64>,
        paths: Vec<PathInfo>,
    ) -> Result<Self, GraphError> {
        let Some(first) = vertices.first() else {
            warn!("no vertices, rejecting graph");
            return Err(GraphError::Empty);
        };
        let first_id = first.id;

        let mut roots = parents
            .iter()
            .enumerate()
            .filter_map(|(idx, parent)| parent.is_none().then_some(VertexId(idx)));
        let Some(root) = roots.next() else {
            warn!("no parentless vertex, rejecting graph");
            return Err(GraphError::NoRoot);
        };
        if let Some(second) = roots.next() {
            let count = 2 + roots.count();
            warn!(count, "several parentless vertices, rejecting graph");
            return Err(GraphError::MultipleRoots {
                count,
                first: vertices[root.0].id,
                second: vertices[second.0].id,
            });
        }

        let mut children = vec![Vec::new(); vertices.len()];
        for (idx, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                children[parent.0].push(VertexId(idx));
            }
        }

        let mut breadth_first = Vec::with_capacity(vertices.len());
        let mut seen = vec![false; vertices.len()];
        let mut queue = VecDeque::from([root]);
        seen[root.0] = true;
        while let Some(vertex) = queue.pop_front() {
            breadth_first.push(vertex);
            for &child in &children[vertex.0] {
                if !seen[child.0] {
                    seen[child.0] = true;
                    queue.push_back(child);
                }
            }
        }
        if breadth_first.len() < vertices.len() {
            let witness = seen
                .iter()
                .position(|visited| !visited)
                .map_or(first_id, |idx| vertices[idx].id);
            let unreachable = vertices.len() - breadth_first.len();
            warn!(unreachable, %witness, "vertices unreachable from the root, rejecting graph");
            return Err(GraphError::Cycle {
                unreachable,
                witness,
            });
        }

        let index = vertices
            .iter()
            .enumerate()
            .map(|(idx, vertex)| (vertex.id, VertexId(idx)))
            .collect();

        debug!(vertices = vertices.len(), root = %vertices[root.0].id, "tree graph assembled");
        Ok(Self {
            vertices,
            parents,
            children,
            weights,
            paths,
            root,
            breadth_first,
            index,
        })
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false`: a valid tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The root vertex.
    #[must_use]
    #[rustfmt::skip]
    pub fn root(&self) -> VertexId { self.root }

    /// Returns the vertex stored at `vertex`.
    ///
    /// # Panics
    /// Panics when `vertex` was produced by a different, smaller graph.
    #[must_use]
    pub fn vertex(&self, vertex: VertexId) -> &Vertex {
        &self.vertices[vertex.0]
    }

    /// Position of `vertex`.
    #[must_use]
    pub fn position(&self, vertex: VertexId) -> Point3 {
        self.vertices[vertex.0].position
    }

    /// Iterates every vertex index in arena order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId)
    }

    /// Looks up a vertex by its stable identity.
    #[must_use]
    pub fn by_node_id(&self, id: NodeId) -> Option<VertexId> {
        self.index.get(&id).copied()
    }

    /// Parent of `vertex`, or `None` for the root.
    #[must_use]
    pub fn parent(&self, vertex: VertexId) -> Option<VertexId> {
        self.parents[vertex.0]
    }

    /// Children of `vertex` in insertion order.
    #[must_use]
    pub fn children(&self, vertex: VertexId) -> &[VertexId] {
        &self.children[vertex.0]
    }

    /// Number of children.
    #[must_use]
    pub fn out_degree(&self, vertex: VertexId) -> usize {
        self.children[vertex.0].len()
    }

    /// Number of parents: 0 for the root, 1 otherwise.
    #[must_use]
    pub fn in_degree(&self, vertex: VertexId) -> usize {
        usize::from(self.parents[vertex.0].is_some())
    }

    /// Weight of the edge from the parent of `vertex` to `vertex` (0 for the
    /// root).
    #[must_use]
    pub fn incoming_weight(&self, vertex: VertexId) -> f64 {
        self.weights[vertex.0]
    }

    /// Whether `vertex` has no children.
    #[must_use]
    pub fn is_tip(&self, vertex: VertexId) -> bool {
        self.children[vertex.0].is_empty()
    }

    /// Whether `vertex` has two or more children.
    #[must_use]
    pub fn is_branch_point(&self, vertex: VertexId) -> bool {
        self.children[vertex.0].len() > 1
    }

    /// Tips in arena order.
    pub fn tips(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices().filter(|&vertex| self.is_tip(vertex))
    }

    /// Branch points in arena order.
    pub fn branch_points(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices().filter(|&vertex| self.is_branch_point(vertex))
    }

    /// Attributes of the path `vertex` belongs to.
    #[must_use]
    pub fn path(&self, vertex: VertexId) -> Option<&PathInfo> {
        self.vertices[vertex.0]
            .path
            .and_then(|path| self.paths.get(path.0))
    }

    /// Registered paths.
    #[must_use]
    pub fn paths(&self) -> &[PathInfo] {
        &self.paths
    }

    /// Total cable length: the sum of all edge weights.
    #[must_use]
    pub fn sum_edge_weights(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Vertices in breadth-first order from the root. Every vertex appears
    /// after its parent; reversing the slice yields descendants first.
    #[must_use]
    pub fn topological_order(&self) -> &[VertexId] {
        &self.breadth_first
    }
}
