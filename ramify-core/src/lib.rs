//! Ramify core library.
//!
//! Topological analysis of traced neuronal arbors: Horton-Strahler
//! classification with per-order branch statistics, and persistent homology
//! of scalar descriptor functions (diagrams, barcodes and landscapes).
//!
//! Graphs are validated once by [`TreeGraphBuilder`] and then shared
//! read-only; every analyser keeps its own scratch state and caches.
//!
//! ```
//! use ramify_core::{Descriptor, NodeId, NodeRecord, PersistenceAnalyzer, Point3, StrahlerAnalyzer, TreeGraph};
//!
//! let graph = TreeGraph::from_records([
//!     NodeRecord::new(NodeId(1), None, Point3::ORIGIN),
//!     NodeRecord::new(NodeId(2), Some(NodeId(1)), Point3::new(0.0, 1.0, 0.0)),
//!     NodeRecord::new(NodeId(3), Some(NodeId(2)), Point3::new(-1.0, 2.0, 0.0)),
//!     NodeRecord::new(NodeId(4), Some(NodeId(2)), Point3::new(1.0, 2.0, 0.0)),
//! ])?;
//!
//! let strahler = StrahlerAnalyzer::new(&graph);
//! assert_eq!(strahler.root_number()?, 2);
//!
//! let persistence = PersistenceAnalyzer::new(&graph);
//! assert_eq!(persistence.diagram(Descriptor::Geodesic)?.len(), 2);
//! # Ok::<(), ramify_core::AnalysisError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub mod graph;
pub mod persistence;
pub mod strahler;

#[cfg(test)]
mod test_utils;

pub use crate::{
    error::{AnalysisError, AnalysisErrorCode, GraphError, GraphErrorCode, Result},
    graph::{
        NodeId, NodeRecord, PathId, PathInfo, Point3, SimplifiedGraph, SwcType, TreeGraph,
        TreeGraphBuilder, Vertex, VertexId,
    },
    persistence::{
        Descriptor, DiagramPoint, Landscape, LandscapeConfig, PersistenceAnalyzer,
        PersistenceDiagram,
    },
    strahler::{Branch, OrderAggregates, StrahlerAnalyzer, StrahlerOrders},
};
