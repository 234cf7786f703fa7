//! Notification center for the shell GUI.
//!
//! Notifications are shown as toasts in a capped live view and recorded in a
//! history the user can open from a bell item in the status bar. Each shown
//! notification hands back a [`NotificationResponse`] that resolves once the
//! user clicks an action, closes the toast, or the entry is cleared.
//!
//! Producers either call [`NotificationCenter`] directly or go through the
//! requisition bus (`showInfo`, `showWarning`, `showError`) after
//! [`NotificationCenter::start`] subscribed the center.
//!
//! Time is explicit: the center moves only when [`NotificationCenter::advance`]
//! is called, which [`NotificationCenter::spawn_driver`] does on a tokio
//! interval.

mod center;
mod response;
mod settings;
mod status;
mod store;
mod types;

pub use center::{CenterOptions, NotificationCenter};
pub use response::NotificationResponse;
pub use settings::{
	DEFAULT_AUTO_HIDE_TIMEOUT, DEFAULT_EXIT_ANIMATION, DEFAULT_INFO_TIMEOUT, DEFAULT_MAX_VISIBLE,
	DEFAULT_TICK_INTERVAL, NotificationSettings, SettingsError,
};
pub use status::{
	BELL, BELL_DOT, BELL_SLASH, BELL_SLASH_DOT, NOTIFICATIONS_ITEM_ID, SHOW_HISTORY_COMMAND,
	StatusBar, StatusBarAlignment, StatusBarItem, StatusBarItemSpec, StatusSummary, history_caption,
};
pub use store::{Resolver, ToastStore};
pub use types::{HistoryView, Notification, NotificationType, ToastId, ToastPhase, ToastView};
