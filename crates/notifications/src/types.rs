//! Core types for the notification center.

use std::fmt;
use std::time::Duration;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotificationType {
	/// Informational message (default). Dismisses itself after a short timeout.
	#[default]
	Information,
	/// Warning message.
	Warning,
	/// Error message. Shown even in do-not-disturb mode.
	Error,
}

/// A message to show to the user.
///
/// Immutable once handed to the center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	pub kind: NotificationType,
	pub text: String,
	/// Optional language of `text` for highlighting ("ansi", "sql", ...).
	pub language: Option<String>,
	/// Live display time. Only honored for informational messages without items.
	pub timeout: Option<Duration>,
	/// Labels of action buttons. Empty means no buttons.
	pub items: Vec<String>,
}

impl Notification {
	pub fn new(kind: NotificationType, text: impl Into<String>) -> Self {
		Self {
			kind,
			text: text.into(),
			language: None,
			timeout: None,
			items: Vec::new(),
		}
	}

	pub fn info(text: impl Into<String>) -> Self {
		Self::new(NotificationType::Information, text)
	}

	pub fn warning(text: impl Into<String>) -> Self {
		Self::new(NotificationType::Warning, text)
	}

	pub fn error(text: impl Into<String>) -> Self {
		Self::new(NotificationType::Error, text)
	}

	#[must_use]
	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = Some(language.into());
		self
	}

	#[must_use]
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}

	/// Sets the action button labels.
	///
	/// Labels should be distinct; with duplicates the response cannot tell
	/// which button was clicked.
	#[must_use]
	pub fn with_items<I, S>(mut self, items: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.items = items.into_iter().map(Into::into).collect();
		self
	}

	pub fn has_items(&self) -> bool {
		!self.items.is_empty()
	}
}

/// Identifier shared by the live and history views of one toast.
///
/// Assigned in increasing order, so a larger id is a newer toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub(crate) u64);

impl ToastId {
	/// Rebuilds an id from its numeric value, e.g. one typed by a user.
	pub const fn from_raw(value: u64) -> Self {
		Self(value)
	}

	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ToastId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "toast-{}", self.0)
	}
}

/// Lifecycle phase of a live toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastPhase {
	/// Admitted, waiting for its first settle step.
	#[default]
	Adding,
	/// Fully visible.
	Normal,
	/// Animating out of the live view.
	Removing,
}

/// A toast as shown in the live view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
	pub id: ToastId,
	pub notification: Notification,
	pub phase: ToastPhase,
}

/// A toast as shown in the history view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
	pub id: ToastId,
	pub notification: Notification,
	/// True until the history view is opened.
	pub is_new: bool,
}
