//! Network endpoint identification.
//!
//! A `NetworkEndpoint` names the JSON-RPC URL transactions are submitted to
//! together with the chain id they are signed for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where deployment transactions are submitted.
///
/// The chain id is expected to match the chain actually served at `url`.
/// Nothing in this type checks that; configuration and the command-line
/// pre-flight are responsible for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkEndpoint {
	/// Configured network name, e.g. "ganache".
	#[serde(default)]
	pub name: Option<String>,
	/// HTTP(S) JSON-RPC URL.
	pub url: String,
	/// EIP-155 chain id.
	pub chain_id: u64,
}

impl NetworkEndpoint {
	pub fn new(url: impl Into<String>, chain_id: u64) -> Self {
		Self {
			name: None,
			url: url.into(),
			chain_id,
		}
	}

	/// Attaches the configured network name for logging and display.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Network name if known, otherwise the URL.
	pub fn label(&self) -> &str {
		self.name.as_deref().unwrap_or(&self.url)
	}
}

impl fmt::Display for NetworkEndpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (chain {})", self.label(), self.chain_id)
	}
}
