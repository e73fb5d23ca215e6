//! Deployment service library.
//!
//! Ties configuration, artifact loading, delivery and the [`Deployer`]
//! together for the `deploy` binary. Configuration is passed in as a value;
//! nothing here reads global state.

use alloy_dyn_abi::DynSolValue;
use deployer_config::{Config, ConfigError};
use deployer_core::{parse_constructor_args, DeployError, Deployer};
use deployer_delivery::{DeliveryError, DeliveryService};
use deployer_types::{ArtifactError, ContractArtifact, Credential, DeploymentResult, NetworkEndpoint};
use std::fmt::Display;
use std::io::Write;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by the `deploy` command.
#[derive(Debug, Error)]
pub enum ServiceError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error("Artifact error: {0}")]
	Artifact(#[from] ArtifactError),
	#[error(transparent)]
	Delivery(#[from] DeliveryError),
	#[error(transparent)]
	Deploy(#[from] DeployError),
	/// The node answered with a different chain id than configured.
	#[error("Network '{network}' is configured for chain {expected} but the node reports chain {actual}")]
	ChainMismatch {
		network: String,
		expected: u64,
		actual: u64,
	},
}

/// Everything resolved from configuration before touching the network.
#[derive(Debug)]
pub struct DeploymentPlan {
	pub endpoint: NetworkEndpoint,
	pub credential: Credential,
	pub artifact: ContractArtifact,
	pub constructor_args: Vec<DynSolValue>,
}

impl DeploymentPlan {
	/// Resolves the network, deployer account, artifact and constructor
	/// arguments named by `config`.
	pub fn from_config(config: &Config, network: Option<&str>) -> Result<Self, ServiceError> {
		let (name, network) = config.select_network(network)?;
		let endpoint = network.endpoint(name);
		let credential = network.deployer_credential()?;

		let artifact = ContractArtifact::find(&config.artifacts.dir, &config.deployment.contract)
			.map_err(|e| match e {
				ArtifactError::NotFound { .. } | ArtifactError::Io { .. } => ServiceError::Artifact(e),
				invalid => ServiceError::Deploy(DeployError::from(invalid)),
			})?;
		let constructor_args = parse_constructor_args(&artifact, &config.deployment.constructor_args)?;

		Ok(Self {
			endpoint,
			credential,
			artifact,
			constructor_args,
		})
	}
}

/// Checks that the node behind the endpoint serves the configured chain.
pub async fn verify_chain_id(
	delivery: &DeliveryService,
	endpoint: &NetworkEndpoint,
) -> Result<(), ServiceError> {
	let actual = delivery.implementation(endpoint.chain_id)?.chain_id().await?;
	if actual != endpoint.chain_id {
		return Err(ServiceError::ChainMismatch {
			network: endpoint.label().to_string(),
			expected: endpoint.chain_id,
			actual,
		});
	}
	Ok(())
}

/// Runs a prepared plan against `delivery`.
pub async fn execute(
	plan: &DeploymentPlan,
	delivery: DeliveryService,
	config: &Config,
) -> Result<DeploymentResult, ServiceError> {
	verify_chain_id(&delivery, &plan.endpoint).await?;

	let mut deployer = Deployer::new(delivery);
	if let Some(timeout) = config.confirmation_timeout() {
		deployer = deployer.with_confirmation_timeout(timeout);
	}

	let result = deployer
		.deploy(
			&plan.artifact,
			&plan.endpoint,
			&plan.credential,
			&plan.constructor_args,
		)
		.await?;
	Ok(result)
}

/// Deploys the configured contract to `network` (or the default network).
pub async fn run(config: &Config, network: Option<&str>) -> Result<DeploymentResult, ServiceError> {
	let plan = DeploymentPlan::from_config(config, network)?;
	info!(
		contract = %plan.artifact.name(),
		network = %plan.endpoint,
		deployer = %plan.credential.address(),
		"Prepared deployment"
	);

	let delivery = DeliveryService::connect(
		std::slice::from_ref(&plan.endpoint),
		config.deployment.confirmations,
	)?;
	execute(&plan, delivery, config).await
}

/// Writes the outcome of a run and returns the process exit status.
///
/// Success prints the single `deployed to 0x...` line to `stdout` and
/// returns 0. Failure prints the error to `stderr` and returns 1.
pub fn report<E: Display>(
	outcome: &Result<DeploymentResult, E>,
	stdout: &mut impl Write,
	stderr: &mut impl Write,
) -> u8 {
	match outcome {
		Ok(result) => match writeln!(stdout, "{result}") {
			Ok(()) => 0,
			Err(_) => 1,
		},
		Err(e) => {
			let _ = writeln!(stderr, "Error: {e}");
			1
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{Address, B256, U256};
	use deployer_config::ConfigBuilder;
	use deployer_delivery::{DeliveryInterface, MockDeliveryInterface};
	use deployer_types::TransactionReceipt;
	use std::collections::HashMap;
	use std::path::Path;
	use std::sync::Arc;
	use tempfile::TempDir;

	const VOTING: &str = r#"{
		"contractName": "Voting",
		"abi": [
			{
				"inputs": [{ "internalType": "string[]", "name": "candidates", "type": "string[]" }],
				"stateMutability": "nonpayable",
				"type": "constructor"
			}
		],
		"bytecode": "0x6080604052"
	}"#;

	fn write_artifact(root: &Path) {
		let path = root.join("contracts/Voting.sol/Voting.json");
		std::fs::create_dir_all(path.parent().unwrap()).unwrap();
		std::fs::write(path, VOTING).unwrap();
	}

	fn config(root: &Path) -> Config {
		ConfigBuilder::new()
			.artifacts_dir(root)
			.constructor_args(vec!["[\"Alice\",\"Bob\"]".to_string()])
			.build()
	}

	fn service(mock: MockDeliveryInterface) -> DeliveryService {
		DeliveryService::new(
			HashMap::from([(1337, Arc::new(mock) as Arc<dyn DeliveryInterface>)]),
			1,
		)
	}

	#[test]
	fn test_plan_from_config() {
		let temp_dir = TempDir::new().unwrap();
		write_artifact(temp_dir.path());

		let plan = DeploymentPlan::from_config(&config(temp_dir.path()), None).unwrap();
		assert_eq!(plan.endpoint.label(), "ganache");
		assert_eq!(plan.endpoint.chain_id, 1337);
		assert_eq!(plan.artifact.name(), "Voting");
		assert_eq!(plan.constructor_args.len(), 1);
	}

	#[test]
	fn test_plan_rejects_bad_constructor_args() {
		let temp_dir = TempDir::new().unwrap();
		write_artifact(temp_dir.path());
		let config = ConfigBuilder::new().artifacts_dir(temp_dir.path()).build();

		let err = DeploymentPlan::from_config(&config, None).unwrap_err();
		assert!(matches!(err, ServiceError::Deploy(DeployError::InvalidArtifact(_))));
	}

	#[test]
	fn test_plan_rejects_unlinked_artifact() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("contracts/Voting.sol/Voting.json");
		std::fs::create_dir_all(path.parent().unwrap()).unwrap();
		std::fs::write(
			&path,
			r#"{
				"contractName": "Voting",
				"abi": [],
				"bytecode": "0x6080__$0123456789abcdef0123456789abcdef01$__6040"
			}"#,
		)
		.unwrap();

		let err = DeploymentPlan::from_config(&config(temp_dir.path()), None).unwrap_err();
		assert!(matches!(err, ServiceError::Deploy(DeployError::InvalidArtifact(_))));
	}

	#[test]
	fn test_report_success_prints_only_address() {
		let address = Address::repeat_byte(0x5a);
		let outcome: Result<DeploymentResult, ServiceError> = Ok(DeploymentResult {
			contract: "Voting".to_string(),
			address,
			transaction_hash: B256::repeat_byte(0x01),
			block_number: 3,
			chain_id: 1337,
			deployer: Address::repeat_byte(0x11),
			gas_used: 250_000,
		});
		let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

		let status = report(&outcome, &mut stdout, &mut stderr);

		assert_eq!(status, 0);
		assert_eq!(
			String::from_utf8(stdout).unwrap(),
			format!("deployed to {}\n", address.to_checksum(None))
		);
		assert!(stderr.is_empty());
	}

	#[test]
	fn test_report_failure_exits_one() {
		let outcome: Result<DeploymentResult, ServiceError> = Err(ServiceError::ChainMismatch {
			network: "ganache".to_string(),
			expected: 1337,
			actual: 1,
		});
		let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

		let status = report(&outcome, &mut stdout, &mut stderr);

		assert_eq!(status, 1);
		assert!(stdout.is_empty());
		let stderr = String::from_utf8(stderr).unwrap();
		assert!(stderr.starts_with("Error: Network 'ganache' is configured for chain 1337"));
		assert_eq!(stderr.lines().count(), 1);
	}

	#[test]
	fn test_plan_missing_artifact() {
		let temp_dir = TempDir::new().unwrap();
		let err = DeploymentPlan::from_config(&config(temp_dir.path()), None).unwrap_err();
		assert!(matches!(err, ServiceError::Artifact(ArtifactError::NotFound { .. })));
	}

	#[test]
	fn test_plan_unknown_network() {
		let temp_dir = TempDir::new().unwrap();
		write_artifact(temp_dir.path());
		let err = DeploymentPlan::from_config(&config(temp_dir.path()), Some("mainnet")).unwrap_err();
		assert!(err.to_string().contains("Network 'mainnet' is not configured"));
	}

	#[tokio::test]
	async fn test_chain_mismatch_stops_before_deploying() {
		let temp_dir = TempDir::new().unwrap();
		write_artifact(temp_dir.path());
		let config = config(temp_dir.path());
		let plan = DeploymentPlan::from_config(&config, None).unwrap();

		let mut mock = MockDeliveryInterface::new();
		mock.expect_chain_id()
			.returning(|| Box::pin(async { Ok(31337) }));
		mock.expect_get_nonce().never();
		mock.expect_submit().never();

		let err = execute(&plan, service(mock), &config).await.unwrap_err();
		assert!(matches!(
			err,
			ServiceError::ChainMismatch { expected: 1337, actual: 31337, .. }
		));
	}

	#[tokio::test]
	async fn test_execute_reports_address() {
		let temp_dir = TempDir::new().unwrap();
		write_artifact(temp_dir.path());
		let config = config(temp_dir.path());
		let plan = DeploymentPlan::from_config(&config, None).unwrap();
		let deployer = plan.credential.address();

		let mut mock = MockDeliveryInterface::new();
		mock.expect_chain_id()
			.returning(|| Box::pin(async { Ok(1337) }));
		mock.expect_get_nonce()
			.returning(|_| Box::pin(async { Ok(4) }));
		mock.expect_get_gas_price()
			.returning(|| Box::pin(async { Ok(1_000_000_000) }));
		mock.expect_estimate_gas()
			.returning(|_| Box::pin(async { Ok(300_000) }));
		mock.expect_get_balance()
			.returning(|_| Box::pin(async { Ok(U256::from(10u64).pow(U256::from(18))) }));
		mock.expect_submit()
			.times(1)
			.returning(|_, _| Box::pin(async { Ok(B256::repeat_byte(0x01)) }));
		mock.expect_wait_for_confirmation()
			.times(1)
			.returning(move |hash, _| {
				Box::pin(async move {
					Ok(TransactionReceipt {
						hash,
						block_number: 9,
						success: true,
						contract_address: Some(deployer.create(4)),
						gas_used: 250_000,
					})
				})
			});

		let result = execute(&plan, service(mock), &config).await.unwrap();
		assert_eq!(result.address, deployer.create(4));
		assert_ne!(result.address, Address::ZERO);
		assert_eq!(result.block_number, 9);
		assert_eq!(result.transaction_hash, B256::repeat_byte(0x01));
		assert_eq!(
			result.to_string(),
			format!("deployed to {}", deployer.create(4).to_checksum(None))
		);
	}
}
