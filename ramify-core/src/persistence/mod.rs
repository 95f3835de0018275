//! Persistent homology of scalar descriptor functions over trees.
//!
//! A descriptor assigns a value to every vertex. Sweeping the tree from the
//! tips towards the root under the elder rule turns the descriptor into a
//! [`PersistenceDiagram`]: one `(birth, death)` point per tip recording where
//! each branch merged into an older one. Diagrams can be summarised as
//! barcodes or sampled into fixed-size [`Landscape`]s.
//!
//! The reduction runs over the [`crate::SimplifiedGraph`] of the input, which
//! keeps only the root, branch points and tips with summed edge weights. All
//! scratch values live in vectors owned by the computation, so any number of
//! analysers may share one graph.

mod descriptor;
mod diagram;
mod landscape;
mod survivor;

use std::array;
use std::cell::RefCell;
use std::collections::HashMap;

use once_cell::unsync::OnceCell;

use crate::error::Result;
use crate::graph::{SimplifiedGraph, TreeGraph, VertexId};
use crate::strahler::StrahlerOrders;

pub use self::descriptor::Descriptor;
pub use self::diagram::{DiagramPoint, PersistenceDiagram};
pub use self::landscape::{Landscape, LandscapeConfig};

/// Persistence analysis of a borrowed [`TreeGraph`].
///
/// Diagrams are computed on first request and cached per descriptor, along
/// with the simplified graph and the Strahler classification needed by
/// [`Descriptor::Centrifugal`]. Landscapes are cached per descriptor and
/// [`LandscapeConfig`].
///
/// # Examples
/// ```
/// use ramify_core::{Descriptor, NodeId, NodeRecord, PersistenceAnalyzer, Point3, TreeGraph};
///
/// let graph = TreeGraph::from_records((0..=10).map(|i| {
///     let parent = (i > 0).then(|| NodeId(i - 1));
///     NodeRecord::new(NodeId(i), parent, Point3::new(i as f64, 0.0, 0.0))
/// }))?;
/// let analyzer = PersistenceAnalyzer::new(&graph);
/// assert_eq!(analyzer.pairs(Descriptor::Geodesic)?, vec![(0.0, 10.0)]);
/// assert_eq!(analyzer.barcode(Descriptor::Geodesic)?, vec![10.0]);
/// # Ok::<(), ramify_core::AnalysisError>(())
/// ```
#[derive(Debug)]
pub struct PersistenceAnalyzer<'g> {
    graph: &'g TreeGraph,
    simplified: OnceCell<SimplifiedGraph>,
    orders: OnceCell<StrahlerOrders>,
    diagrams: [OnceCell<PersistenceDiagram>; Descriptor::COUNT],
    landscapes: RefCell<HashMap<(Descriptor, LandscapeConfig), Landscape>>,
}

impl<'g> PersistenceAnalyzer<'g> {
    /// Creates an analyser; nothing is computed until first queried.
    #[must_use]
    pub fn new(graph: &'g TreeGraph) -> Self {
        Self {
            graph,
            simplified: OnceCell::new(),
            orders: OnceCell::new(),
            diagrams: array::from_fn(|_| OnceCell::new()),
            landscapes: RefCell::new(HashMap::new()),
        }
    }

    /// The analysed graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph(&self) -> &'g TreeGraph { self.graph }

    /// Descriptors this analyser understands.
    #[must_use]
    pub const fn descriptors() -> &'static [Descriptor] {
        &Descriptor::ALL
    }

    fn simplified(&self) -> Result<&SimplifiedGraph> {
        self.simplified
            .get_or_try_init(|| Ok(self.graph.simplified()?))
    }

    /// Persistence diagram of `descriptor`, computed once per analyser.
    ///
    /// # Errors
    /// Returns [`crate::AnalysisError::MissingPath`] for
    /// [`Descriptor::PathOrder`] on a graph with path-less vertices, and
    /// propagates structural and classification failures.
    pub fn diagram(&self, descriptor: Descriptor) -> Result<&PersistenceDiagram> {
        self.diagrams[descriptor.index()].get_or_try_init(|| {
            let simplified = self.simplified()?;
            let orders = match descriptor {
                Descriptor::Centrifugal => Some(
                    self.orders
                        .get_or_try_init(|| StrahlerOrders::classify(simplified.graph()))?,
                ),
                _ => None,
            };
            PersistenceDiagram::compute(simplified, descriptor, orders)
        })
    }

    /// Persistence diagram of the descriptor called `name`.
    ///
    /// # Errors
    /// Returns [`crate::AnalysisError::UnknownDescriptor`] for unsupported
    /// names, otherwise as [`PersistenceAnalyzer::diagram`].
    pub fn diagram_named(&self, name: &str) -> Result<&PersistenceDiagram> {
        self.diagram(name.parse()?)
    }

    /// `(birth, death)` pairs of the diagram.
    ///
    /// # Errors
    /// As [`PersistenceAnalyzer::diagram`].
    pub fn pairs(&self, descriptor: Descriptor) -> Result<Vec<(f64, f64)>> {
        Ok(self.diagram(descriptor)?.pairs())
    }

    /// `(merge, tip)` vertex pairs of the diagram.
    ///
    /// # Errors
    /// As [`PersistenceAnalyzer::diagram`].
    pub fn node_pairs(&self, descriptor: Descriptor) -> Result<Vec<(VertexId, VertexId)>> {
        Ok(self.diagram(descriptor)?.node_pairs())
    }

    /// Bar lengths of the diagram.
    ///
    /// # Errors
    /// As [`PersistenceAnalyzer::diagram`].
    pub fn barcode(&self, descriptor: Descriptor) -> Result<Vec<f64>> {
        Ok(self.diagram(descriptor)?.barcode())
    }

    /// Persistence landscape of the diagram, sampled once per
    /// `(descriptor, config)` pair.
    ///
    /// # Errors
    /// As [`PersistenceAnalyzer::diagram`].
    pub fn landscape(&self, descriptor: Descriptor, config: LandscapeConfig) -> Result<Landscape> {
        let key = (descriptor, config);
        if let Some(landscape) = self.landscapes.borrow().get(&key) {
            return Ok(landscape.clone());
        }
        let landscape = self.diagram(descriptor)?.landscape(config);
        self.landscapes.borrow_mut().insert(key, landscape.clone());
        Ok(landscape)
    }
}
