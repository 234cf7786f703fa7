//! Error types for configuration loading.

use std::path::PathBuf;

use shellgui_notifications::SettingsError;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unexpected key.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The `[notifications]` section holds unusable values.
	#[error("invalid notification settings: {0}")]
	Notifications(#[from] SettingsError),

	/// A log filter directive was empty.
	#[error("log filter must not be empty")]
	EmptyLogFilter,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
