//! Helper functions shared across the deployment crates.

pub mod formatting;
#[cfg(any(test, feature = "testing"))]
pub mod tests;

pub use formatting::{truncate_hash, with_0x_prefix, without_0x_prefix};
