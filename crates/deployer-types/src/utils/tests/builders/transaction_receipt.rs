//! Builder for `TransactionReceipt`.

use crate::TransactionReceipt;
use alloy_primitives::{Address, B256};

/// Builds receipts for a successful contract creation by default.
#[derive(Debug, Clone)]
pub struct TransactionReceiptBuilder {
	hash: B256,
	block_number: u64,
	success: bool,
	contract_address: Option<Address>,
	gas_used: u64,
}

impl Default for TransactionReceiptBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TransactionReceiptBuilder {
	pub fn new() -> Self {
		Self {
			hash: B256::repeat_byte(0xab),
			block_number: 1,
			success: true,
			contract_address: Some(Address::repeat_byte(0xcc)),
			gas_used: 150_000,
		}
	}

	pub fn hash(mut self, hash: B256) -> Self {
		self.hash = hash;
		self
	}

	pub fn block_number(mut self, block_number: u64) -> Self {
		self.block_number = block_number;
		self
	}

	pub fn success(mut self, success: bool) -> Self {
		self.success = success;
		self
	}

	pub fn contract_address(mut self, address: Option<Address>) -> Self {
		self.contract_address = address;
		self
	}

	pub fn build(self) -> TransactionReceipt {
		TransactionReceipt {
			hash: self.hash,
			block_number: self.block_number,
			success: self.success,
			contract_address: self.contract_address,
			gas_used: self.gas_used,
		}
	}
}
