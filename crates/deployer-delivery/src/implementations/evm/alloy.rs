//! Alloy-based EVM delivery.
//!
//! Signs transactions locally with the borrowed credential and submits the
//! raw envelope, so the node never needs to hold or unlock the key.

use crate::{DeliveryError, DeliveryInterface};
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, B256, U256};
use alloy_provider::{DynProvider, PendingTransactionConfig, Provider, ProviderBuilder};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::TransactionRequest;
use alloy_transport::layers::RetryBackoffLayer;
use alloy_transport::TransportError;
use async_trait::async_trait;
use deployer_types::{utils::truncate_hash, Credential, NetworkEndpoint, TransactionReceipt};
use std::time::Duration;

/// Receipt polling interval. Local development chains mine instantly.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Alloy-based EVM delivery implementation for a single endpoint.
pub struct AlloyDelivery {
	provider: DynProvider,
	endpoint: NetworkEndpoint,
}

impl AlloyDelivery {
	/// Creates a delivery for `endpoint`.
	///
	/// No request is made here; an unreachable endpoint surfaces on the
	/// first call.
	pub fn new(endpoint: &NetworkEndpoint) -> Result<Self, DeliveryError> {
		let url = endpoint.url.parse().map_err(|e| {
			DeliveryError::Network(format!("Invalid RPC URL for {}: {}", endpoint.label(), e))
		})?;

		// Configure retry layer for handling network errors and rate limits
		let retry_layer = RetryBackoffLayer::new(
			5,    // max_retry: retry up to 5 times
			1000, // backoff: initial backoff in milliseconds
			10,   // cups: compute units per second
		);

		let client = RpcClient::builder().layer(retry_layer).http(url);

		// Fields are filled explicitly by the deployer
		let provider = ProviderBuilder::new()
			.disable_recommended_fillers()
			.connect_client(client);

		provider.client().set_poll_interval(POLL_INTERVAL);

		Ok(Self {
			provider: provider.erased(),
			endpoint: endpoint.clone(),
		})
	}

	pub fn endpoint(&self) -> &NetworkEndpoint {
		&self.endpoint
	}
}

/// Maps a node or transport failure onto a delivery error.
///
/// `from_node` is true when the node answered with a JSON-RPC error
/// rather than the request failing in transit.
pub(crate) fn classify_rejection(message: &str, from_node: bool) -> DeliveryError {
	let lower = message.to_lowercase();

	if lower.contains("insufficient funds") {
		return DeliveryError::InsufficientFunds(message.to_string());
	}

	if lower.contains("nonce too low")
		|| lower.contains("nonce too high")
		|| lower.contains("already known")
		|| lower.contains("replacement transaction underpriced")
		|| lower.contains("invalid nonce")
	{
		return DeliveryError::NonceConflict(message.to_string());
	}

	if from_node {
		DeliveryError::Rejected(message.to_string())
	} else {
		DeliveryError::Network(message.to_string())
	}
}

fn rpc_error(context: &str, err: TransportError) -> DeliveryError {
	classify_rejection(&format!("{}: {}", context, err), err.is_error_resp())
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	async fn chain_id(&self) -> Result<u64, DeliveryError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| rpc_error("Failed to get chain id", e))
	}

	async fn get_nonce(&self, address: Address) -> Result<u64, DeliveryError> {
		self.provider
			.get_transaction_count(address)
			.pending()
			.await
			.map_err(|e| rpc_error("Failed to get nonce", e))
	}

	async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError> {
		self.provider
			.get_balance(address)
			.await
			.map_err(|e| rpc_error("Failed to get balance", e))
	}

	async fn get_gas_price(&self) -> Result<u128, DeliveryError> {
		self.provider
			.get_gas_price()
			.await
			.map_err(|e| rpc_error("Failed to get gas price", e))
	}

	async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64, DeliveryError> {
		self.provider
			.estimate_gas(tx)
			.await
			.map_err(|e| rpc_error("Failed to estimate gas", e))
	}

	async fn submit(
		&self,
		tx: TransactionRequest,
		credential: &Credential,
	) -> Result<B256, DeliveryError> {
		let wallet = EthereumWallet::from(credential.signer().clone());

		tracing::debug!(
			network = %self.endpoint,
			from = %credential.address(),
			nonce = ?tx.nonce,
			gas_limit = ?tx.gas,
			data_len = tx.input.input().map(|d| d.len()).unwrap_or(0),
			"Signing transaction"
		);

		let envelope = tx
			.build(&wallet)
			.await
			.map_err(|e| DeliveryError::Signing(e.to_string()))?;

		let pending = self
			.provider
			.send_tx_envelope(envelope)
			.await
			.map_err(|e| {
				tracing::error!(network = %self.endpoint, error = %e, "Transaction submission failed");
				rpc_error("Failed to send transaction", e)
			})?;

		let tx_hash = *pending.tx_hash();
		tracing::info!(
			network = %self.endpoint,
			tx_hash = %truncate_hash(&tx_hash.to_string()),
			"Transaction submitted"
		);
		Ok(tx_hash)
	}

	async fn wait_for_confirmation(
		&self,
		hash: B256,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		tracing::info!(
			tx_hash = %truncate_hash(&hash.to_string()),
			confirmations,
			"Waiting for confirmations"
		);

		let config = PendingTransactionConfig::new(hash)
			.with_required_confirmations(confirmations)
			.with_timeout(None);

		let pending = self
			.provider
			.watch_pending_transaction(config)
			.await
			.map_err(|e| DeliveryError::Network(format!("Transaction watch failed: {}", e)))?;

		let confirmed_hash = pending
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to confirm transaction: {}", e)))?;

		let receipt = self
			.provider
			.get_transaction_receipt(confirmed_hash)
			.await
			.map_err(|e| rpc_error("Failed to get receipt", e))?
			.ok_or_else(|| {
				DeliveryError::Network(format!(
					"Receipt for {} not found on {}",
					confirmed_hash, self.endpoint
				))
			})?;

		Ok(TransactionReceipt {
			hash: receipt.transaction_hash,
			block_number: receipt.block_number.unwrap_or_default(),
			success: receipt.status(),
			contract_address: receipt.contract_address,
			gas_used: receipt.gas_used,
		})
	}
}
