use thiserror::Error;

use crate::persistence::PersistenceError;

#[derive(Debug, Error)]
pub enum VaultError {
	#[error("Validation failed: {0}")]
	Validation(String),
	#[error("Degenerate input: IDF weighting needs at least 2 documents, got {0}")]
	DegenerateInput(usize),
	#[error("Submission not found: {0}")]
	NotFound(String),
	#[error("Persistence failed: {0}")]
	Persistence(#[from] PersistenceError),
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl VaultError {
	pub fn validation(msg: impl Into<String>) -> Self {
		Self::Validation(msg.into())
	}

	pub fn code(&self) -> &str {
		match self {
			Self::Validation(_) => "VAULT_VALIDATION",
			Self::DegenerateInput(_) => "VAULT_DEGENERATE_INPUT",
			Self::NotFound(_) => "VAULT_NOT_FOUND",
			Self::Persistence(_) => "VAULT_PERSISTENCE",
			Self::Serialization(_) => "VAULT_SERIALIZATION",
			Self::Io(_) => "VAULT_IO",
		}
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		serde_json::json!({
			"vaultCode": self.code(),
			"message": self.to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn codes_are_stable() {
		assert_eq!(VaultError::validation("x").code(), "VAULT_VALIDATION");
		assert_eq!(VaultError::DegenerateInput(1).code(), "VAULT_DEGENERATE_INPUT");
		let err = VaultError::from(PersistenceError::Corruption("bad".into()));
		assert_eq!(err.code(), "VAULT_PERSISTENCE");
	}

	#[test]
	fn json_rpc_payload_carries_code_and_message() {
		let payload = VaultError::NotFound("abc".into()).to_json_rpc_error();
		assert_eq!(payload["vaultCode"], "VAULT_NOT_FOUND");
		assert_eq!(payload["message"], "Submission not found: abc");
	}
}
