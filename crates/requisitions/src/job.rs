use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RequisitionError, Result};
use crate::requisition::Requisition;

/// One step of a sequential job, see [`RequisitionBus::execute_job`](crate::RequisitionBus::execute_job).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEntry {
	/// Wire name of the requisition to execute.
	pub requisition: String,
	pub parameter: Value,
}

impl JobEntry {
	/// Builds a job entry for requisition `R`.
	pub fn new<R: Requisition>(payload: &R::Payload) -> Result<Self> {
		let parameter = serde_json::to_value(payload).map_err(|source| RequisitionError::Encode {
			name: R::NAME,
			source,
		})?;
		Ok(Self {
			requisition: R::NAME.to_string(),
			parameter,
		})
	}
}
