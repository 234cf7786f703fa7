//! Tunables of the notification center.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default live time of informational toasts.
pub const DEFAULT_INFO_TIMEOUT: Duration = Duration::from_millis(5000);
/// Live time of warnings, errors and toasts with action items.
pub const DEFAULT_AUTO_HIDE_TIMEOUT: Duration = Duration::from_secs(15);
/// Maximum number of toasts in the live view.
pub const DEFAULT_MAX_VISIBLE: usize = 3;
/// Duration of the exit animation.
pub const DEFAULT_EXIT_ANIMATION: Duration = Duration::from_millis(200);
/// Clock resolution of the background driver.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Timing and capacity settings, read from the `[notifications]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct NotificationSettings {
	#[serde(rename = "info-timeout-ms", with = "millis")]
	pub info_timeout: Duration,
	#[serde(rename = "auto-hide-timeout-ms", with = "millis")]
	pub auto_hide_timeout: Duration,
	pub max_visible: usize,
	#[serde(rename = "exit-animation-ms", with = "millis")]
	pub exit_animation: Duration,
	#[serde(rename = "tick-interval-ms", with = "millis")]
	pub tick_interval: Duration,
}

impl Default for NotificationSettings {
	fn default() -> Self {
		Self {
			info_timeout: DEFAULT_INFO_TIMEOUT,
			auto_hide_timeout: DEFAULT_AUTO_HIDE_TIMEOUT,
			max_visible: DEFAULT_MAX_VISIBLE,
			exit_animation: DEFAULT_EXIT_ANIMATION,
			tick_interval: DEFAULT_TICK_INTERVAL,
		}
	}
}

/// Invalid notification settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
	#[error("max-visible must be at least 1")]
	NoVisibleToasts,
	#[error("tick-interval-ms must be greater than zero")]
	ZeroTickInterval,
}

impl NotificationSettings {
	/// Checks the invariants the center relies on.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.max_visible == 0 {
			return Err(SettingsError::NoVisibleToasts);
		}
		if self.tick_interval.is_zero() {
			return Err(SettingsError::ZeroTickInterval);
		}
		Ok(())
	}
}

/// Durations as integer milliseconds.
mod millis {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
		u64::deserialize(deserializer).map(Duration::from_millis)
	}
}
