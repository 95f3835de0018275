//! Shared test utilities used across the ramify crates.
//!
//! The crate deliberately knows nothing about `ramify-core` types so it can
//! back both unit tests inside the core crate and its integration suites.

pub mod proptest_profile;
pub mod tracing;
