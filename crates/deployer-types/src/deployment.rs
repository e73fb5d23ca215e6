//! Deployment outcomes.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport-neutral view of a mined transaction's receipt.
///
/// Delivery implementations convert their native receipt into this shape so
/// the deployer never depends on a particular RPC client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// Hash of the transaction.
	pub hash: B256,
	/// Block the transaction was included in.
	pub block_number: u64,
	/// False if execution reverted.
	pub success: bool,
	/// Address of the created contract, for creation transactions.
	pub contract_address: Option<Address>,
	/// Gas consumed by the transaction.
	pub gas_used: u64,
}

/// The published contract, reported once per confirmed deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
	/// Contract name from the artifact.
	pub contract: String,
	/// On-chain address of the new contract.
	pub address: Address,
	/// Hash of the creation transaction.
	pub transaction_hash: B256,
	/// Block that included the creation transaction.
	pub block_number: u64,
	/// Chain the contract lives on.
	pub chain_id: u64,
	/// Account that paid for and signed the deployment.
	pub deployer: Address,
	/// Gas consumed by the creation transaction.
	pub gas_used: u64,
}

impl fmt::Display for DeploymentResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "deployed to {}", self.address)
	}
}
