//! Builder patterns for deployment types

pub mod artifact;
pub mod transaction_receipt;

pub use artifact::ContractArtifactBuilder;
pub use transaction_receipt::TransactionReceiptBuilder;
