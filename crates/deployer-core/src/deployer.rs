//! The deployment flow: encode, prepare, submit, confirm, extract.

use crate::{encoding::encode_deployment, DeployError};
use alloy_dyn_abi::DynSolValue;
use alloy_network::TransactionBuilder;
use alloy_primitives::U256;
use alloy_rpc_types::TransactionRequest;
use deployer_delivery::{DeliveryError, DeliveryService};
use deployer_types::{
	truncate_hash, ContractArtifact, Credential, DeploymentResult, NetworkEndpoint,
};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Publishes compiled contracts through a [`DeliveryService`].
///
/// Holds no per-deployment state; `deploy` may be driven concurrently from
/// several tasks.
#[derive(Debug, Clone)]
pub struct Deployer {
	delivery: DeliveryService,
	confirmation_timeout: Option<Duration>,
}

impl Deployer {
	pub fn new(delivery: DeliveryService) -> Self {
		Self {
			delivery,
			confirmation_timeout: None,
		}
	}

	/// Bounds the wait for confirmation. Without it the wait is unbounded.
	pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
		self.confirmation_timeout = Some(timeout);
		self
	}

	/// Deploys `artifact` to `endpoint`, signing with `credential`.
	///
	/// Resolves once the creation transaction is confirmed. Constructor
	/// arguments are checked before any network call; an unfunded sender is
	/// detected before submission. Dropping the returned future stops the
	/// local wait only: a submitted transaction stays pending on the network.
	#[instrument(skip_all, fields(contract = %artifact.name(), network = %endpoint))]
	pub async fn deploy(
		&self,
		artifact: &ContractArtifact,
		endpoint: &NetworkEndpoint,
		credential: &Credential,
		constructor_args: &[DynSolValue],
	) -> Result<DeploymentResult, DeployError> {
		let init_code = encode_deployment(artifact, constructor_args)?;

		let delivery = self.delivery.implementation(endpoint.chain_id)?;
		let sender = credential.address();

		let nonce = delivery.get_nonce(sender).await?;
		let gas_price = delivery.get_gas_price().await?;
		let mut tx = TransactionRequest::default()
			.with_from(sender)
			.with_deploy_code(init_code)
			.with_nonce(nonce)
			.with_chain_id(endpoint.chain_id)
			.with_gas_price(gas_price);
		let gas_limit = delivery.estimate_gas(tx.clone()).await?;
		tx.set_gas_limit(gas_limit);

		let max_cost = U256::from(gas_limit) * U256::from(gas_price);
		let balance = delivery.get_balance(sender).await?;
		if balance < max_cost {
			return Err(DeliveryError::InsufficientFunds(format!(
				"{} holds {} wei but the deployment may cost up to {} wei",
				sender, balance, max_cost
			))
			.into());
		}

		let expected_address = sender.create(nonce);
		info!(
			sender = %sender,
			nonce,
			gas_limit,
			gas_price,
			expected_address = %expected_address,
			"Submitting contract creation"
		);

		let tx_hash = delivery.submit(tx, credential).await?;
		info!(tx_hash = %truncate_hash(&tx_hash.to_string()), "Awaiting confirmation");

		let confirmations = self.delivery.min_confirmations();
		let wait = delivery.wait_for_confirmation(tx_hash, confirmations);
		let confirmed = match self.confirmation_timeout {
			Some(timeout) => tokio::time::timeout(timeout, wait)
				.await
				.map_err(|_| DeployError::ConfirmationTimeout { tx_hash, timeout })?,
			None => wait.await,
		};
		let receipt = confirmed.map_err(|e| DeployError::ConfirmationFailed {
			tx_hash,
			reason: e.to_string(),
		})?;

		if !receipt.success {
			return Err(DeployError::ConfirmationFailed {
				tx_hash,
				reason: format!("transaction reverted in block {}", receipt.block_number),
			});
		}
		let address = receipt
			.contract_address
			.ok_or_else(|| DeployError::ConfirmationFailed {
				tx_hash,
				reason: "receipt carries no contract address".to_string(),
			})?;

		if address != expected_address {
			warn!(
				expected = %expected_address,
				actual = %address,
				"Contract address differs from the sender/nonce prediction"
			);
		}

		info!(
			address = %address,
			block = receipt.block_number,
			gas_used = receipt.gas_used,
			"Contract deployed"
		);

		Ok(DeploymentResult {
			contract: artifact.name().to_string(),
			address,
			transaction_hash: receipt.hash,
			block_number: receipt.block_number,
			chain_id: endpoint.chain_id,
			deployer: sender,
			gas_used: receipt.gas_used,
		})
	}
}
