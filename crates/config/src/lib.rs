//! Configuration for the shell GUI host.
//!
//! Configuration is written in TOML. Every section and key is optional;
//! missing values fall back to the defaults.
//!
//! # Configuration Files
//!
//! The host looks for `$XDG_CONFIG_HOME/shellgui/config.toml` (or
//! `~/.config/shellgui/config.toml`) unless a path is given explicitly.
//! A missing default file is not an error.
//!
//! ```toml
//! [app]
//! embedded = false
//!
//! [notifications]
//! info-timeout-ms = 5000
//! auto-hide-timeout-ms = 15000
//! max-visible = 3
//! exit-animation-ms = 200
//! tick-interval-ms = 50
//!
//! [log]
//! filter = "shellgui=debug,info"
//! directory = "/tmp/shellgui-logs"
//! ```

pub mod error;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
pub use error::{ConfigError, Result};
pub use shellgui_notifications::NotificationSettings;

/// Name of the directory under the user config dir.
pub const APP_DIR: &str = "shellgui";
/// File name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";

/// Parsed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub app: AppConfig,
	pub notifications: NotificationSettings,
	pub log: LogConfig,
}

/// Process-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
	/// Run embedded in a host that displays notifications itself.
	pub embedded: bool,
}

/// Logging settings. `RUST_LOG` overrides `filter`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
	/// `tracing` filter directives.
	pub filter: Option<String>,
	/// Write logs to a file in this directory instead of stderr.
	pub directory: Option<PathBuf>,
}

impl Config {
	/// Parse and validate a TOML string.
	pub fn parse(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content)
	}

	/// Load `path` if given, else the default file if it exists, else defaults.
	pub fn discover(path: Option<&Path>) -> Result<Self> {
		if let Some(path) = path {
			return Self::load(path);
		}
		match default_path() {
			Some(path) if path.is_file() => Self::load(path),
			_ => Ok(Self::default()),
		}
	}

	/// Checks values serde cannot reject on its own.
	pub fn validate(&self) -> Result<()> {
		self.notifications.validate()?;
		if self
			.log
			.filter
			.as_deref()
			.is_some_and(|filter| filter.trim().is_empty())
		{
			return Err(ConfigError::EmptyLogFilter);
		}
		Ok(())
	}
}

/// `$XDG_CONFIG_HOME/shellgui/config.toml`, if a config dir is known.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests;
