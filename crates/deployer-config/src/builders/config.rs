//! Configuration builder for creating test and development configurations.

use crate::{ArtifactsConfig, Config, DeploymentConfig, NetworkConfig};
use deployer_types::SecretString;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults to a single local "ganache" network on chain 1337 funded by the
/// first Anvil development key.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	default_network: Option<String>,
	artifacts_dir: PathBuf,
	contract: String,
	constructor_args: Vec<String>,
	confirmations: u64,
	confirmation_timeout_seconds: Option<u64>,
	networks: BTreeMap<String, NetworkConfig>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		let mut networks = BTreeMap::new();
		networks.insert(
			"ganache".to_string(),
			NetworkConfig {
				url: "http://127.0.0.1:7545".to_string(),
				chain_id: 1337,
				accounts: vec![SecretString::from(
					"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
				)],
			},
		);

		Self {
			default_network: Some("ganache".to_string()),
			artifacts_dir: PathBuf::from("artifacts"),
			contract: "Voting".to_string(),
			constructor_args: Vec::new(),
			confirmations: 1,
			confirmation_timeout_seconds: None,
			networks,
		}
	}

	pub fn default_network(mut self, name: Option<&str>) -> Self {
		self.default_network = name.map(str::to_string);
		self
	}

	pub fn artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.artifacts_dir = dir.into();
		self
	}

	pub fn constructor_args(mut self, args: Vec<String>) -> Self {
		self.constructor_args = args;
		self
	}

	pub fn confirmations(mut self, confirmations: u64) -> Self {
		self.confirmations = confirmations;
		self
	}

	pub fn confirmation_timeout_seconds(mut self, seconds: Option<u64>) -> Self {
		self.confirmation_timeout_seconds = seconds;
		self
	}

	/// Adds or replaces a named network.
	pub fn network(mut self, name: &str, url: &str, chain_id: u64, accounts: &[&str]) -> Self {
		self.networks.insert(
			name.to_string(),
			NetworkConfig {
				url: url.to_string(),
				chain_id,
				accounts: accounts.iter().map(|k| SecretString::from(*k)).collect(),
			},
		);
		self
	}

	/// Removes all networks, including the default one.
	pub fn clear_networks(mut self) -> Self {
		self.networks.clear();
		self
	}

	/// Builds the configuration without validating it.
	pub fn build(self) -> Config {
		Config {
			default_network: self.default_network,
			artifacts: ArtifactsConfig {
				dir: self.artifacts_dir,
			},
			deployment: DeploymentConfig {
				contract: self.contract,
				constructor_args: self.constructor_args,
				confirmations: self.confirmations,
				confirmation_timeout_seconds: self.confirmation_timeout_seconds,
			},
			networks: self.networks,
		}
	}
}
