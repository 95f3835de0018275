//! Benchmark support crate for ramify.
//!
//! Provides seeded synthetic neuronal trees and parameter types used by the
//! Criterion benchmarks for Strahler classification and persistence.

pub mod error;
pub mod params;
pub mod source;
