//! Status bar integration.
//!
//! The center owns a single status bar item whose icon and tooltip summarize
//! the history. The host environment supplies the actual bar through
//! [`StatusBar`].

/// Bell icon, nothing new.
pub const BELL: &str = "$(bell)";
/// Bell icon with a dot, unseen entries exist.
pub const BELL_DOT: &str = "$(bell-dot)";
/// Muted bell, nothing new.
pub const BELL_SLASH: &str = "$(bell-slash)";
/// Muted bell, unseen entries exist.
pub const BELL_SLASH_DOT: &str = "$(bell-slash-dot)";

/// Id of the status bar item owned by the notification center.
pub const NOTIFICATIONS_ITEM_ID: &str = "showNotificationHistory";
/// Command the status bar item triggers when clicked.
pub const SHOW_HISTORY_COMMAND: &str = "notifications:showHistory";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusBarAlignment {
	Left,
	#[default]
	Right,
}

/// Creation parameters for a status bar item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBarItemSpec {
	pub id: String,
	/// Command delivered as a `statusBarButtonClick` when the item is clicked.
	pub command: String,
	pub tooltip: String,
	pub text: String,
	pub alignment: StatusBarAlignment,
}

impl StatusBarItemSpec {
	/// The bell item of the notification center.
	pub fn notifications() -> Self {
		Self {
			id: NOTIFICATIONS_ITEM_ID.to_string(),
			command: SHOW_HISTORY_COMMAND.to_string(),
			tooltip: "Show Notifications".to_string(),
			text: BELL.to_string(),
			alignment: StatusBarAlignment::Right,
		}
	}
}

/// A created status bar item.
pub trait StatusBarItem: Send {
	fn set_text(&mut self, text: &str);
	fn set_tooltip(&mut self, tooltip: &str);
	/// Removes the item from the bar.
	fn dispose(&mut self);
}

/// Factory for status bar items.
pub trait StatusBar: Send + Sync {
	fn create_item(&self, spec: StatusBarItemSpec) -> Box<dyn StatusBarItem>;
}

/// Icon and tooltip of the status bar item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
	pub text: &'static str,
	pub tooltip: String,
}

impl StatusSummary {
	/// Projects the history counts and display modes onto the status item.
	///
	/// An open history view never shows the unseen dot.
	pub fn project(total: usize, new: usize, silent: bool, history_shown: bool) -> Self {
		let unseen = new > 0 && !history_shown;
		let text = match (silent, unseen) {
			(false, false) => BELL,
			(false, true) => BELL_DOT,
			(true, false) => BELL_SLASH,
			(true, true) => BELL_SLASH_DOT,
		};
		let tooltip = if history_shown {
			"Hide Notifications".to_string()
		} else if total == 0 {
			"No Notifications".to_string()
		} else {
			match new {
				0 => "No New Notifications".to_string(),
				1 => "1 New Notification".to_string(),
				n => format!("{n} New Notifications"),
			}
		};
		Self { text, tooltip }
	}
}

/// Caption of the history panel header.
pub fn history_caption(total: usize, new: usize) -> String {
	if total == 0 {
		return "NO NOTIFICATIONS".to_string();
	}
	match new {
		0 => "NO NEW NOTIFICATIONS".to_string(),
		1 => "1 NEW NOTIFICATION".to_string(),
		n => format!("{n} NEW NOTIFICATIONS"),
	}
}
