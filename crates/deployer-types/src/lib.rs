//! Common types for the contract deployment workspace.
//!
//! This crate defines the data model shared by configuration, delivery and
//! the deployer itself: where transactions go, who signs them, what gets
//! published and what comes back once a deployment is confirmed.

/// Signing credentials borrowed by the deployer for a single submission.
pub mod account;
/// Compiled contract artifacts produced by an external build step.
pub mod artifact;
/// Deployment outcomes and transport-neutral receipts.
pub mod deployment;
/// Network endpoint identification.
pub mod networks;
/// Secure string type for handling private keys.
pub mod secret_string;
/// Formatting helpers and test builders.
pub mod utils;

pub use account::{Credential, CredentialError};
pub use artifact::{ArtifactError, ContractArtifact};
pub use deployment::{DeploymentResult, TransactionReceipt};
pub use networks::NetworkEndpoint;
pub use secret_string::SecretString;
pub use utils::{truncate_hash, with_0x_prefix, without_0x_prefix};
