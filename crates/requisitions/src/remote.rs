//! Host boundary for embedded mode.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{RequisitionError, Result};
use crate::requisition::Requisition;

/// Which side of the host boundary produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSource {
	/// The embedded application.
	#[default]
	App,
	/// The hosting application.
	Host,
}

/// A requisition serialized for the host boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedMessage {
	pub source: MessageSource,
	/// Wire name of the requisition.
	pub command: String,
	#[serde(default)]
	pub data: Value,
}

impl EmbeddedMessage {
	/// Serializes `payload` as a message for requisition `R`.
	pub fn encode<R: Requisition>(source: MessageSource, payload: &R::Payload) -> Result<Self> {
		let data = serde_json::to_value(payload).map_err(|source| RequisitionError::Encode {
			name: R::NAME,
			source,
		})?;
		Ok(Self {
			source,
			command: R::NAME.to_string(),
			data,
		})
	}
}

/// Receiver of requisitions forwarded to the host.
pub trait RemoteTarget: Send + Sync {
	/// Posts a message to the host. Returns the host's acknowledgement.
	fn post_message(&self, message: EmbeddedMessage) -> bool;
}

impl RemoteTarget for mpsc::UnboundedSender<EmbeddedMessage> {
	fn post_message(&self, message: EmbeddedMessage) -> bool {
		self.send(message).is_ok()
	}
}
