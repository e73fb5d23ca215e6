//! Signing credentials.
//!
//! A `Credential` pairs a local private key with the account address derived
//! from it. Credentials are owned by the configuration layer and lent to the
//! deployer for the duration of one submission.

use crate::{without_0x_prefix, SecretString};
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use std::fmt;
use thiserror::Error;

/// Errors raised while turning configured key material into a credential.
#[derive(Debug, Error)]
pub enum CredentialError {
	/// The key is not 32 bytes of hex or is not a valid secp256k1 scalar.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// A private signing key and the account it controls.
#[derive(Clone)]
pub struct Credential {
	signer: PrivateKeySigner,
}

impl Credential {
	/// Parses a hex-encoded private key (with or without 0x prefix).
	pub fn from_private_key(private_key_hex: &str) -> Result<Self, CredentialError> {
		validate_private_key_hex(private_key_hex).map_err(CredentialError::InvalidKey)?;

		let signer = private_key_hex
			.parse::<PrivateKeySigner>()
			.map_err(|e| CredentialError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}

	/// Parses a configured secret without copying it out of the wrapper.
	pub fn from_secret(secret: &SecretString) -> Result<Self, CredentialError> {
		secret.with_exposed(Self::from_private_key)
	}

	/// Account address controlled by this key.
	pub fn address(&self) -> Address {
		self.signer.address()
	}

	/// Underlying signer, for transport implementations that sign locally.
	pub fn signer(&self) -> &PrivateKeySigner {
		&self.signer
	}
}

impl fmt::Debug for Credential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credential")
			.field("address", &self.address())
			.field("key", &"[REDACTED]")
			.finish()
	}
}

/// Checks that a string is 32 bytes of hex, optionally 0x-prefixed.
pub fn validate_private_key_hex(key: &str) -> Result<(), String> {
	let key_without_prefix = without_0x_prefix(key);

	if key_without_prefix.len() != 64 {
		return Err("Private key must be 64 hex characters (32 bytes)".to_string());
	}

	if hex::decode(key_without_prefix).is_err() {
		return Err("Private key must be valid hexadecimal".to_string());
	}

	Ok(())
}
