//! Constructor argument handling.

use crate::DeployError;
use alloy_dyn_abi::{DynSolValue, JsonAbiExt, Specifier};
use alloy_primitives::Bytes;
use deployer_types::ContractArtifact;

/// Builds the init code for a creation transaction: bytecode followed by
/// the ABI-encoded constructor arguments.
///
/// Arguments are type-checked against the artifact's constructor.
pub fn encode_deployment(
	artifact: &ContractArtifact,
	args: &[DynSolValue],
) -> Result<Bytes, DeployError> {
	let mut code = artifact.bytecode().to_vec();

	match artifact.constructor() {
		Some(constructor) => {
			let encoded = constructor.abi_encode_input(args).map_err(|e| {
				DeployError::InvalidArtifact(format!(
					"Constructor arguments for {} do not match its ABI: {}",
					artifact.name(),
					e
				))
			})?;
			code.extend_from_slice(&encoded);
		},
		None if args.is_empty() => {},
		None => {
			return Err(DeployError::InvalidArtifact(format!(
				"{} has no constructor but {} argument(s) were given",
				artifact.name(),
				args.len()
			)));
		},
	}

	Ok(Bytes::from(code))
}

/// Parses textual constructor arguments (from configuration) into values of
/// the types the artifact's constructor declares.
pub fn parse_constructor_args(
	artifact: &ContractArtifact,
	raw: &[String],
) -> Result<Vec<DynSolValue>, DeployError> {
	let inputs = artifact
		.constructor()
		.map(|c| c.inputs.as_slice())
		.unwrap_or_default();

	if inputs.len() != raw.len() {
		return Err(DeployError::InvalidArtifact(format!(
			"{} constructor takes {} argument(s), {} given",
			artifact.name(),
			inputs.len(),
			raw.len()
		)));
	}

	inputs
		.iter()
		.zip(raw)
		.map(|(param, value)| {
			let ty = param.resolve().map_err(|e| {
				DeployError::InvalidArtifact(format!(
					"Unsupported constructor parameter type '{}': {}",
					param.ty, e
				))
			})?;
			ty.coerce_str(value).map_err(|e| {
				DeployError::InvalidArtifact(format!(
					"Cannot parse '{}' as {}: {}",
					value, param.ty, e
				))
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{Address, U256};
	use deployer_types::utils::tests::builders::ContractArtifactBuilder;

	#[test]
	fn test_zero_arg_constructor_is_bytecode_only() {
		let artifact = ContractArtifactBuilder::new().build();
		let code = encode_deployment(&artifact, &[]).unwrap();
		assert_eq!(&code, artifact.bytecode());
	}

	#[test]
	fn test_constructor_args_appended() {
		let artifact = ContractArtifactBuilder::new()
			.constructor(&["uint256", "address"])
			.build();
		let args = [
			DynSolValue::Uint(U256::from(3), 256),
			DynSolValue::Address(Address::repeat_byte(0x11)),
		];

		let code = encode_deployment(&artifact, &args).unwrap();
		let bytecode_len = artifact.bytecode().len();
		assert_eq!(code.len(), bytecode_len + 64);
		assert_eq!(code[bytecode_len + 31], 3);
		assert_eq!(&code[bytecode_len + 44..], Address::repeat_byte(0x11).as_slice());
	}

	#[test]
	fn test_arity_mismatch_rejected() {
		let artifact = ContractArtifactBuilder::new().constructor(&["uint256"]).build();
		let err = encode_deployment(&artifact, &[]).unwrap_err();
		assert!(matches!(err, DeployError::InvalidArtifact(_)));
	}

	#[test]
	fn test_type_mismatch_rejected() {
		let artifact = ContractArtifactBuilder::new().constructor(&["uint256"]).build();
		let err = encode_deployment(&artifact, &[DynSolValue::Bool(true)]).unwrap_err();
		assert!(matches!(err, DeployError::InvalidArtifact(msg) if msg.contains("do not match")));
	}

	#[test]
	fn test_args_without_constructor_rejected() {
		let artifact = ContractArtifactBuilder::new().no_constructor().build();
		assert!(encode_deployment(&artifact, &[]).is_ok());

		let err = encode_deployment(&artifact, &[DynSolValue::Bool(true)]).unwrap_err();
		assert!(matches!(err, DeployError::InvalidArtifact(msg) if msg.contains("no constructor")));
	}

	#[test]
	fn test_parse_constructor_args() {
		let artifact = ContractArtifactBuilder::new()
			.constructor(&["string[]", "uint256", "bool"])
			.build();
		let raw = vec![
			"[\"Alice\", \"Bob\"]".to_string(),
			"42".to_string(),
			"true".to_string(),
		];

		let values = parse_constructor_args(&artifact, &raw).unwrap();
		assert_eq!(
			values,
			vec![
				DynSolValue::Array(vec![
					DynSolValue::String("Alice".to_string()),
					DynSolValue::String("Bob".to_string()),
				]),
				DynSolValue::Uint(U256::from(42), 256),
				DynSolValue::Bool(true),
			]
		);
		assert!(encode_deployment(&artifact, &values).is_ok());
	}

	#[test]
	fn test_parse_constructor_args_errors() {
		let artifact = ContractArtifactBuilder::new().constructor(&["uint8"]).build();

		let err = parse_constructor_args(&artifact, &[]).unwrap_err();
		assert!(err.to_string().contains("takes 1 argument(s), 0 given"));

		let err = parse_constructor_args(&artifact, &["not-a-number".to_string()]).unwrap_err();
		assert!(err.to_string().contains("Cannot parse 'not-a-number' as uint8"));

		let bare = ContractArtifactBuilder::new().no_constructor().build();
		assert!(parse_constructor_args(&bare, &[]).unwrap().is_empty());
	}
}
