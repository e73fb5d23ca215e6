//! Compiled contract artifacts.
//!
//! Artifacts are produced by an external build step. Both Hardhat
//! (`artifacts/contracts/<Name>.sol/<Name>.json`, bytecode as a hex string)
//! and Foundry (`out/<Name>.sol/<Name>.json`, bytecode under `object`)
//! layouts are understood. Only creation bytecode is kept; deployed
//! bytecode, source maps and build info are ignored.

use crate::without_0x_prefix;
use alloy_json_abi::{Constructor, JsonAbi};
use alloy_primitives::Bytes;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory depth searched when the artifact is not at a well-known path.
const MAX_SEARCH_DEPTH: usize = 6;

/// Errors that can occur while loading a contract artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
	/// Error reading an artifact file.
	#[error("Failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	/// Error parsing the artifact JSON or its ABI.
	#[error("Invalid artifact JSON: {0}")]
	Json(#[from] serde_json::Error),
	/// No artifact for the contract was found under the directory.
	#[error("Contract {name} not found in {dir}")]
	NotFound { name: String, dir: PathBuf },
	/// Artifact has no creation bytecode (interface or abstract contract).
	#[error("Contract {0} has no deployable bytecode")]
	MissingBytecode(String),
	/// Bytecode still contains library link placeholders.
	#[error("Contract {0} has unlinked library references")]
	UnlinkedLibrary(String),
	/// Bytecode is not valid hex.
	#[error("Invalid bytecode hex for {name}: {reason}")]
	InvalidBytecode { name: String, reason: String },
}

/// Compiled bytecode and ABI of a contract ready for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
	name: String,
	abi: JsonAbi,
	bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
	#[serde(default)]
	contract_name: Option<String>,
	abi: JsonAbi,
	#[serde(default)]
	bytecode: Option<RawBytecode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
	/// Hardhat: `"bytecode": "0x6080..."`
	Hex(String),
	/// Foundry: `"bytecode": { "object": "0x6080...", ... }`
	Object { object: String },
}

impl RawBytecode {
	fn as_str(&self) -> &str {
		match self {
			RawBytecode::Hex(hex) => hex,
			RawBytecode::Object { object } => object,
		}
	}
}

impl ContractArtifact {
	/// Creates an artifact from parts, rejecting empty bytecode.
	pub fn new(
		name: impl Into<String>,
		abi: JsonAbi,
		bytecode: Bytes,
	) -> Result<Self, ArtifactError> {
		let name = name.into();
		if bytecode.is_empty() {
			return Err(ArtifactError::MissingBytecode(name));
		}
		Ok(Self {
			name,
			abi,
			bytecode,
		})
	}

	/// Parses an artifact JSON document.
	///
	/// `fallback_name` is used when the document carries no `contractName`
	/// (Foundry output does not).
	pub fn from_json_str(json: &str, fallback_name: &str) -> Result<Self, ArtifactError> {
		let raw: RawArtifact = serde_json::from_str(json)?;
		let name = raw
			.contract_name
			.filter(|n| !n.is_empty())
			.unwrap_or_else(|| fallback_name.to_string());

		let hex_str = raw
			.bytecode
			.as_ref()
			.map(RawBytecode::as_str)
			.map(without_0x_prefix)
			.unwrap_or_default();

		if hex_str.is_empty() {
			return Err(ArtifactError::MissingBytecode(name));
		}
		if hex_str.contains("__") {
			return Err(ArtifactError::UnlinkedLibrary(name));
		}

		let bytecode = hex::decode(hex_str).map_err(|e| ArtifactError::InvalidBytecode {
			name: name.clone(),
			reason: e.to_string(),
		})?;

		Self::new(name, raw.abi, Bytes::from(bytecode))
	}

	/// Reads and parses an artifact file.
	pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
		let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
			path: path.to_path_buf(),
			source,
		})?;

		let fallback_name = path
			.file_stem()
			.and_then(|s| s.to_str())
			.unwrap_or_default();

		Self::from_json_str(&content, fallback_name)
	}

	/// Locates and loads the artifact for `name` under `dir`.
	///
	/// Well-known Hardhat and Foundry locations are tried first, then the
	/// directory tree is searched for `<name>.sol/<name>.json`.
	pub fn find(dir: &Path, name: &str) -> Result<Self, ArtifactError> {
		let file_name = format!("{}.json", name);
		let source_dir = format!("{}.sol", name);

		let candidates = [
			dir.join("contracts").join(&source_dir).join(&file_name),
			dir.join(&source_dir).join(&file_name),
			dir.join(&file_name),
		];

		if let Some(path) = candidates.iter().find(|p| p.is_file()) {
			return Self::from_file(path);
		}

		match search_dir(dir, &source_dir, &file_name, 0) {
			Some(path) => Self::from_file(&path),
			None => Err(ArtifactError::NotFound {
				name: name.to_string(),
				dir: dir.to_path_buf(),
			}),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn abi(&self) -> &JsonAbi {
		&self.abi
	}

	/// Creation bytecode, without constructor arguments.
	pub fn bytecode(&self) -> &Bytes {
		&self.bytecode
	}

	/// Constructor definition, if the contract declares one.
	pub fn constructor(&self) -> Option<&Constructor> {
		self.abi.constructor()
	}
}

fn search_dir(dir: &Path, source_dir: &str, file_name: &str, depth: usize) -> Option<PathBuf> {
	if depth > MAX_SEARCH_DEPTH {
		return None;
	}

	let entries = std::fs::read_dir(dir).ok()?;
	let mut subdirs = Vec::new();

	for entry in entries.flatten() {
		let path = entry.path();
		if !path.is_dir() {
			continue;
		}
		let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		if dir_name == "build-info" {
			continue;
		}
		if dir_name == source_dir {
			let candidate = path.join(file_name);
			if candidate.is_file() {
				return Some(candidate);
			}
		}
		subdirs.push(path);
	}

	subdirs.sort();
	subdirs
		.iter()
		.find_map(|sub| search_dir(sub, source_dir, file_name, depth + 1))
}
