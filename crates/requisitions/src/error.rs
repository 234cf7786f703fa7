//! Error types for requisition dispatch.

use thiserror::Error;

/// Errors raised while moving requisitions across the host boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RequisitionError {
	/// A host message carried a payload that does not match the requisition.
	#[error("invalid payload for requisition '{name}': {source}")]
	Decode {
		name: String,
		source: serde_json::Error,
	},

	/// A payload could not be serialized for the host.
	#[error("failed to encode payload for requisition '{name}': {source}")]
	Encode {
		name: &'static str,
		source: serde_json::Error,
	},

	/// Two requisition types registered under one wire name with different payloads.
	#[error("payload type mismatch for requisition '{0}'")]
	PayloadMismatch(&'static str),
}

/// Result type for requisition operations.
pub type Result<T> = std::result::Result<T, RequisitionError>;
