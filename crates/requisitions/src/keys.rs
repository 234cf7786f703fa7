//! Requisitions shared by the notification subsystem and its producers.

use serde::{Deserialize, Serialize};

use crate::define_requisitions;

/// Payload of [`StatusBarButtonClick`]: the command bound to the clicked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBarClick {
	#[serde(rename = "type")]
	pub kind: String,
}

impl StatusBarClick {
	pub fn new(kind: impl Into<String>) -> Self {
		Self { kind: kind.into() }
	}
}

define_requisitions! {
	/// Show an informational notification.
	ShowInfo => "showInfo" (String),
	/// Show a warning notification.
	ShowWarning => "showWarning" (String),
	/// Show an error notification. Errors are never silenced.
	ShowError => "showError" (String),
	/// A status bar item was clicked.
	StatusBarButtonClick => "statusBarButtonClick" (StatusBarClick),
	/// Free text, mostly for debugging host round trips.
	Message => "message" (String),
}
