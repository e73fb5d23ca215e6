//! Test builders for deployment types
//!
//! Fluent builder APIs and well-known fixtures for TESTING purposes.
pub mod builders;
