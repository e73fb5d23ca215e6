//! Transaction delivery for contract deployments.
//!
//! This module handles the submission and monitoring of blockchain
//! transactions. The deployer talks to networks only through
//! [`DeliveryInterface`], so the RPC client stays an implementation detail
//! and tests can swap in mocks or in-memory ledgers.

use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use deployer_types::{Credential, NetworkEndpoint, TransactionReceipt};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Endpoint unreachable or transport failure.
	#[error("Network error: {0}")]
	Network(String),
	/// The sender cannot pay for the transaction.
	#[error("Insufficient funds: {0}")]
	InsufficientFunds(String),
	/// The node rejected the nonce (already used, too high, or replaced).
	#[error("Nonce conflict: {0}")]
	NonceConflict(String),
	/// Any other rejection by the node before inclusion.
	#[error("Transaction rejected: {0}")]
	Rejected(String),
	/// The transaction could not be built or signed locally.
	#[error("Signing failed: {0}")]
	Signing(String),
	/// No delivery is configured for the requested chain.
	#[error("No implementation available for chain {0}")]
	NoImplementationAvailable(u64),
}

/// Trait defining the interface for transaction delivery implementations.
///
/// One implementation serves one network endpoint. All methods are
/// read-only with respect to the implementation itself, so a single
/// instance can serve concurrent deployments.
#[async_trait]
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait DeliveryInterface: Send + Sync {
	/// Chain id reported by the node.
	async fn chain_id(&self) -> Result<u64, DeliveryError>;

	/// Next nonce for `address`, counting pending transactions.
	async fn get_nonce(&self, address: Address) -> Result<u64, DeliveryError>;

	/// Native balance of `address` in wei.
	async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError>;

	/// Current gas price in wei.
	async fn get_gas_price(&self) -> Result<u128, DeliveryError>;

	/// Estimates gas units for a transaction without submitting it.
	async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64, DeliveryError>;

	/// Signs a fully populated transaction with `credential` and submits it.
	///
	/// Returns the transaction hash once the node has accepted the
	/// transaction into its pool.
	async fn submit(
		&self,
		tx: TransactionRequest,
		credential: &Credential,
	) -> Result<B256, DeliveryError>;

	/// Waits until the transaction is included with `confirmations` blocks.
	///
	/// There is no internal timeout; callers bound the wait themselves.
	async fn wait_for_confirmation(
		&self,
		hash: B256,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError>;
}

/// Service that routes deliveries to the implementation for a chain.
#[derive(Clone)]
pub struct DeliveryService {
	/// Map of chain IDs to their corresponding delivery implementations.
	implementations: HashMap<u64, Arc<dyn DeliveryInterface>>,
	/// Confirmations required before a transaction counts as included.
	min_confirmations: u64,
}

impl DeliveryService {
	/// Creates a new DeliveryService with the specified implementations.
	pub fn new(
		implementations: HashMap<u64, Arc<dyn DeliveryInterface>>,
		min_confirmations: u64,
	) -> Self {
		Self {
			implementations,
			min_confirmations,
		}
	}

	/// Builds an alloy-backed delivery for each endpoint.
	pub fn connect(
		endpoints: &[NetworkEndpoint],
		min_confirmations: u64,
	) -> Result<Self, DeliveryError> {
		let mut implementations: HashMap<u64, Arc<dyn DeliveryInterface>> = HashMap::new();
		for endpoint in endpoints {
			let delivery = implementations::evm::alloy::AlloyDelivery::new(endpoint)?;
			implementations.insert(endpoint.chain_id, Arc::new(delivery));
		}
		Ok(Self::new(implementations, min_confirmations))
	}

	/// Returns the implementation serving `chain_id`.
	pub fn implementation(&self, chain_id: u64) -> Result<&Arc<dyn DeliveryInterface>, DeliveryError> {
		self.implementations
			.get(&chain_id)
			.ok_or(DeliveryError::NoImplementationAvailable(chain_id))
	}

	pub fn min_confirmations(&self) -> u64 {
		self.min_confirmations
	}
}

impl std::fmt::Debug for DeliveryService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut chains: Vec<_> = self.implementations.keys().collect();
		chains.sort();
		f.debug_struct("DeliveryService")
			.field("chains", &chains)
			.field("min_confirmations", &self.min_confirmations)
			.finish()
	}
}
