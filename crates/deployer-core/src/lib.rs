//! Contract publication.
//!
//! The [`Deployer`] turns a compiled artifact into a confirmed on-chain
//! contract: encode the constructor, submit a signed creation transaction,
//! wait for inclusion and report the address. Each call either publishes
//! exactly one contract or fails with the first error it meets; nothing is
//! retried.

pub mod deployer;
pub mod encoding;

pub use deployer::Deployer;
pub use encoding::{encode_deployment, parse_constructor_args};

use alloy_primitives::B256;
use deployer_delivery::DeliveryError;
use deployer_types::ArtifactError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while publishing a contract.
#[derive(Debug, Error)]
pub enum DeployError {
	/// The artifact cannot be encoded with the given constructor arguments.
	/// Nothing was submitted.
	#[error("Invalid artifact: {0}")]
	InvalidArtifact(String),
	/// The transaction was not accepted before inclusion.
	#[error("Submission failed: {0}")]
	Submission(#[from] DeliveryError),
	/// The transaction was included but reverted, or produced no contract.
	#[error("Confirmation failed for {tx_hash}: {reason}")]
	ConfirmationFailed { tx_hash: B256, reason: String },
	/// The caller-imposed bound on the confirmation wait expired.
	/// The transaction may still be mined later.
	#[error("Confirmation of {tx_hash} timed out after {timeout:?}")]
	ConfirmationTimeout { tx_hash: B256, timeout: Duration },
}

impl From<ArtifactError> for DeployError {
	fn from(err: ArtifactError) -> Self {
		DeployError::InvalidArtifact(err.to_string())
	}
}
