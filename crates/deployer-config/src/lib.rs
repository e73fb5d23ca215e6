//! Configuration module for the contract deployer.
//!
//! This module provides structures and utilities for managing deployment
//! configuration. It supports loading configuration from TOML files with
//! environment variable substitution and validates that every configured
//! network can actually be used for a deployment.
//!
//! ## Environment Variables
//!
//! Any string in the file may reference `${VAR}` or `${VAR:-default}`.
//! Private keys should always be supplied this way rather than committed.

pub mod builders;

pub use builders::config::ConfigBuilder;

use deployer_types::{Credential, NetworkEndpoint, SecretString};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the deployer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Network used when none is selected on the command line.
	#[serde(default)]
	pub default_network: Option<String>,
	/// Where compiled artifacts are read from.
	#[serde(default)]
	pub artifacts: ArtifactsConfig,
	/// What to deploy and how long to wait for it.
	#[serde(default)]
	pub deployment: DeploymentConfig,
	/// Named networks, e.g. `[networks.ganache]`.
	pub networks: BTreeMap<String, NetworkConfig>,
}

/// Location of the external build step's output.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
	/// Hardhat `artifacts/` or Foundry `out/` directory.
	/// Relative paths are resolved against the config file's directory.
	#[serde(default = "default_artifacts_dir")]
	pub dir: PathBuf,
}

impl Default for ArtifactsConfig {
	fn default() -> Self {
		Self {
			dir: default_artifacts_dir(),
		}
	}
}

/// Parameters of the deployment itself.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeploymentConfig {
	/// Contract name as it appears in the artifacts.
	#[serde(default = "default_contract")]
	pub contract: String,
	/// Constructor arguments, coerced to the ABI parameter types.
	#[serde(default)]
	pub constructor_args: Vec<String>,
	/// Confirmations required before the deployment counts as done.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
	/// Optional bound on the confirmation wait. Unbounded when absent.
	#[serde(default)]
	pub confirmation_timeout_seconds: Option<u64>,
}

impl Default for DeploymentConfig {
	fn default() -> Self {
		Self {
			contract: default_contract(),
			constructor_args: Vec::new(),
			confirmations: default_confirmations(),
			confirmation_timeout_seconds: None,
		}
	}
}

/// Configuration for a single network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP(S) JSON-RPC URL.
	pub url: String,
	/// Chain id the network is expected to report.
	pub chain_id: u64,
	/// Funded private keys. The first one signs deployments.
	pub accounts: Vec<SecretString>,
}

impl NetworkConfig {
	/// Endpoint for this network, labelled with its configured name.
	pub fn endpoint(&self, name: &str) -> NetworkEndpoint {
		NetworkEndpoint::new(self.url.clone(), self.chain_id).with_name(name)
	}

	/// Credential of the first configured account.
	pub fn deployer_credential(&self) -> Result<Credential, ConfigError> {
		let key = self
			.accounts
			.first()
			.ok_or_else(|| ConfigError::Validation("No accounts configured".into()))?;
		Credential::from_secret(key)
			.map_err(|e| ConfigError::Validation(format!("Account #0 is invalid: {e}")))
	}
}

fn default_artifacts_dir() -> PathBuf {
	PathBuf::from("artifacts")
}

fn default_contract() -> String {
	"Voting".to_string()
}

/// Returns the default number of confirmations required.
fn default_confirmations() -> u64 {
	1
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let var_name = var_name.as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{var_name}' not found"
					)));
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file.
	///
	/// Environment variables must already be present in the process
	/// environment; the binary loads `.env` before calling this.
	pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("{}: {}", path.display(), e),
			))
		})?;

		let mut config: Config = content.parse()?;

		if config.artifacts.dir.is_relative() {
			if let Some(base_dir) = path.parent() {
				config.artifacts.dir = base_dir.join(&config.artifacts.dir);
			}
		}

		tracing::debug!(
			path = %path.display(),
			networks = config.networks.len(),
			"Loaded configuration"
		);
		Ok(config)
	}

	/// Validates the configuration.
	///
	/// - At least one network is configured
	/// - `default_network`, if set, names a configured network
	/// - Every network has an http(s) URL, a non-zero chain id and at least
	///   one well-formed private key
	/// - Confirmations and the optional timeout are within bounds
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"At least one network must be configured".into(),
			));
		}

		if let Some(ref name) = self.default_network {
			if !self.networks.contains_key(name) {
				return Err(ConfigError::Validation(format!(
					"Default network '{name}' not found in networks"
				)));
			}
		}

		for (name, network) in &self.networks {
			if !(network.url.starts_with("http://") || network.url.starts_with("https://")) {
				return Err(ConfigError::Validation(format!(
					"Network '{name}' url must start with http:// or https://"
				)));
			}
			if network.chain_id == 0 {
				return Err(ConfigError::Validation(format!(
					"Network '{name}' chain_id must be greater than 0"
				)));
			}
			if network.accounts.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network '{name}' must have at least one account"
				)));
			}
			for (index, key) in network.accounts.iter().enumerate() {
				key.with_exposed(deployer_types::account::validate_private_key_hex)
					.map_err(|e| {
						ConfigError::Validation(format!(
							"Network '{name}' account #{index}: {e}"
						))
					})?;
			}
		}

		if self.deployment.contract.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Deployment contract name cannot be empty".into(),
			));
		}

		if self.deployment.confirmations == 0 {
			return Err(ConfigError::Validation(
				"confirmations must be at least 1".into(),
			));
		}
		if self.deployment.confirmations > 100 {
			return Err(ConfigError::Validation(
				"confirmations cannot exceed 100".into(),
			));
		}

		if let Some(timeout) = self.deployment.confirmation_timeout_seconds {
			if !(1..=3600).contains(&timeout) {
				return Err(ConfigError::Validation(
					"confirmation_timeout_seconds must be between 1 and 3600 seconds".into(),
				));
			}
		}

		Ok(())
	}

	/// Picks the network to deploy to.
	///
	/// An explicit name wins, then `default_network`, then the only
	/// configured network. Anything else is ambiguous.
	pub fn select_network(
		&self,
		requested: Option<&str>,
	) -> Result<(&str, &NetworkConfig), ConfigError> {
		let name = match requested.or(self.default_network.as_deref()) {
			Some(name) => name,
			None if self.networks.len() == 1 => self
				.networks
				.keys()
				.next()
				.map(String::as_str)
				.unwrap_or_default(),
			None => {
				let names: Vec<&str> = self.networks.keys().map(String::as_str).collect();
				return Err(ConfigError::Validation(format!(
					"Multiple networks configured ({}); select one with --network",
					names.join(", ")
				)));
			},
		};

		self.networks
			.get_key_value(name)
			.map(|(k, v)| (k.as_str(), v))
			.ok_or_else(|| ConfigError::Validation(format!("Network '{name}' is not configured")))
	}

	/// Bound on the confirmation wait, if configured.
	pub fn confirmation_timeout(&self) -> Option<Duration> {
		self.deployment
			.confirmation_timeout_seconds
			.map(Duration::from_secs)
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved first and the configuration is
/// validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
