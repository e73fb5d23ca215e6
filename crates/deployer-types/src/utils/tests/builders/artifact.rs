//! Builder for `ContractArtifact`.

use crate::ContractArtifact;
use alloy_json_abi::{Constructor, JsonAbi, Param, StateMutability};
use alloy_primitives::Bytes;

/// Builds artifacts with a tiny creation bytecode and an optional
/// constructor taking the given Solidity types.
#[derive(Debug, Clone)]
pub struct ContractArtifactBuilder {
	name: String,
	bytecode: Bytes,
	constructor_inputs: Option<Vec<String>>,
}

impl Default for ContractArtifactBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ContractArtifactBuilder {
	pub fn new() -> Self {
		Self {
			name: "Voting".to_string(),
			bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
			constructor_inputs: Some(Vec::new()),
		}
	}

	/// Declares a constructor with parameters of the given Solidity types.
	pub fn constructor(mut self, types: &[&str]) -> Self {
		self.constructor_inputs = Some(types.iter().map(|t| t.to_string()).collect());
		self
	}

	/// Leaves the ABI without any constructor entry.
	pub fn no_constructor(mut self) -> Self {
		self.constructor_inputs = None;
		self
	}

	/// # Panics
	/// Panics if the bytecode is empty.
	pub fn build(self) -> ContractArtifact {
		let mut abi = JsonAbi::default();
		if let Some(types) = self.constructor_inputs {
			let inputs = types
				.iter()
				.enumerate()
				.map(|(i, ty)| Param {
					ty: ty.clone(),
					name: format!("arg{}", i),
					components: Vec::new(),
					internal_type: None,
				})
				.collect();
			abi.constructor = Some(Constructor {
				inputs,
				state_mutability: StateMutability::NonPayable,
			});
		}
		ContractArtifact::new(self.name, abi, self.bytecode).expect("builder bytecode is non-empty")
	}
}
