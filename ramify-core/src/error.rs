//! Error types for the ramify core library.
//!
//! Structural problems with an input tree surface as [`GraphError`] while the
//! graph is being built, before any analysis runs. Invalid parameters and
//! violated algorithm invariants surface as [`AnalysisError`].

use std::fmt;

use thiserror::Error;

use crate::graph::NodeId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A structural violation detected while building a [`crate::TreeGraph`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// The graph contained no vertices.
    #[error("cannot build a tree from zero nodes")]
    Empty,
    /// Two nodes shared the same identifier.
    #[error("node id {id} appears more than once")]
    DuplicateNodeId {
        /// The repeated identifier.
        id: NodeId,
    },
    /// A node referenced a parent that was never registered.
    #[error("node {id} references unknown parent {parent}")]
    UnknownParent {
        /// The node holding the dangling reference.
        id: NodeId,
        /// The missing parent identifier.
        parent: NodeId,
    },
    /// A node referenced a path that was never registered.
    #[error("node {id} references unknown path {path}")]
    UnknownPath {
        /// The node holding the dangling reference.
        id: NodeId,
        /// Index of the missing path.
        path: usize,
    },
    /// A node carried a NaN or infinite coordinate or radius.
    #[error("node {id} has a non-finite coordinate or radius")]
    NonFiniteCoordinate {
        /// The offending node.
        id: NodeId,
    },
    /// No node lacked a parent, so the graph has no root.
    #[error("graph has no root")]
    NoRoot,
    /// More than one node lacked a parent.
    #[error("graph has {count} roots (first two: {first}, {second})")]
    MultipleRoots {
        /// Number of parentless nodes.
        count: usize,
        /// First parentless node.
        first: NodeId,
        /// Second parentless node.
        second: NodeId,
    },
    /// Some nodes are not reachable from the root, which implies a cycle.
    #[error("{unreachable} node(s) are not reachable from the root (cycle through node {witness})")]
    Cycle {
        /// Number of nodes outside the rooted tree.
        unreachable: usize,
        /// One node that lies on, or hangs off, a cycle.
        witness: NodeId,
    },
    /// A requested node does not exist in the graph.
    #[error("node {id} is not part of the graph")]
    UnknownNode {
        /// The missing identifier.
        id: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The graph contained no vertices.
        Empty => Empty => "GRAPH_EMPTY",
        /// Two nodes shared the same identifier.
        DuplicateNodeId => DuplicateNodeId { .. } => "GRAPH_DUPLICATE_NODE_ID",
        /// A node referenced a parent that was never registered.
        UnknownParent => UnknownParent { .. } => "GRAPH_UNKNOWN_PARENT",
        /// A node referenced a path that was never registered.
        UnknownPath => UnknownPath { .. } => "GRAPH_UNKNOWN_PATH",
        /// A node carried a non-finite coordinate or radius.
        NonFiniteCoordinate => NonFiniteCoordinate { .. } => "GRAPH_NON_FINITE_COORDINATE",
        /// No node lacked a parent.
        NoRoot => NoRoot => "GRAPH_NO_ROOT",
        /// More than one node lacked a parent.
        MultipleRoots => MultipleRoots { .. } => "GRAPH_MULTIPLE_ROOTS",
        /// Some nodes are not reachable from the root.
        Cycle => Cycle { .. } => "GRAPH_CYCLE",
        /// A requested node does not exist in the graph.
        UnknownNode => UnknownNode { .. } => "GRAPH_UNKNOWN_NODE",
    }
}

/// Error type produced by the Strahler and persistence analysers.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// The underlying graph violated a structural invariant.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// A Strahler order outside `[1, highest]` was requested.
    #[error("invalid branch order {order}: expected 1 <= order <= {highest}")]
    InvalidOrder {
        /// The requested order.
        order: u32,
        /// Highest order with at least one branch.
        highest: u32,
    },
    /// The requested Strahler order has no branches.
    #[error("no branches of order {order}")]
    EmptyOrder {
        /// The requested order.
        order: u32,
    },
    /// A descriptor name did not match any supported descriptor.
    #[error("unknown descriptor `{name}`; supported descriptors: {supported}")]
    UnknownDescriptor {
        /// The unrecognised name as supplied by the caller.
        name: String,
        /// Comma-separated list of supported names.
        supported: String,
    },
    /// The `path-order` descriptor met a vertex without a path.
    #[error("node {id} is not associated with a path")]
    MissingPath {
        /// The node lacking a path.
        id: NodeId,
    },
    /// A landscape parameter was zero.
    #[error("landscape parameter `{parameter}` must be at least 1 (got {got})")]
    InvalidLandscapeParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The supplied value.
        got: usize,
    },
    /// Precomputed Strahler orders did not match the graph they were used on.
    #[error("orders cover {got} vertices but the graph has {expected}")]
    MismatchedOrders {
        /// Number of vertices in the graph.
        expected: usize,
        /// Number of classified vertices supplied.
        got: usize,
    },
    /// Strahler classification left a vertex without an order.
    #[error("vertex {id} was never classified ({remaining} vertices left unclassified)")]
    UnclassifiedVertex {
        /// First unclassified node.
        id: NodeId,
        /// Total number of unclassified vertices.
        remaining: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`AnalysisError`] variants.
    enum AnalysisErrorCode for AnalysisError {
        /// The underlying graph violated a structural invariant.
        Graph => Graph(..) => "ANALYSIS_GRAPH",
        /// A Strahler order outside the valid range was requested.
        InvalidOrder => InvalidOrder { .. } => "ANALYSIS_INVALID_ORDER",
        /// The requested Strahler order has no branches.
        EmptyOrder => EmptyOrder { .. } => "ANALYSIS_EMPTY_ORDER",
        /// A descriptor name did not match any supported descriptor.
        UnknownDescriptor => UnknownDescriptor { .. } => "ANALYSIS_UNKNOWN_DESCRIPTOR",
        /// The `path-order` descriptor met a vertex without a path.
        MissingPath => MissingPath { .. } => "ANALYSIS_MISSING_PATH",
        /// A landscape parameter was zero.
        InvalidLandscapeParameter => InvalidLandscapeParameter { .. } => "ANALYSIS_INVALID_LANDSCAPE_PARAMETER",
        /// Precomputed Strahler orders did not match the graph.
        MismatchedOrders => MismatchedOrders { .. } => "ANALYSIS_MISMATCHED_ORDERS",
        /// Strahler classification left a vertex without an order.
        UnclassifiedVertex => UnclassifiedVertex { .. } => "ANALYSIS_UNCLASSIFIED_VERTEX",
    }
}

impl AnalysisError {
    /// Retrieve the inner [`GraphErrorCode`] when the error is structural.
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the analysers.
pub type Result<T> = core::result::Result<T, AnalysisError>;
