//! Benchmark setup error type.
//!
//! Aggregates the errors that may arise while preparing benchmark trees so
//! that setup functions can propagate failures with `?` instead of using
//! `.expect()`.

use crate::source::SyntheticError;
use ramify_core::{AnalysisError, GraphError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic tree generation failed.
    #[error("synthetic tree generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// The generated records did not form a tree.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
    /// An analysis step failed while warming up.
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
