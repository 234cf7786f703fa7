use std::time::Duration;

use pretty_assertions::assert_eq;
use shellgui_notifications::SettingsError;

use super::*;

#[test]
fn empty_input_yields_defaults() {
	let config = Config::parse("").unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(config.notifications.max_visible, 3);
	assert_eq!(config.notifications.info_timeout, Duration::from_millis(5000));
}

#[test]
fn sections_override_defaults() {
	let config = Config::parse(
		r#"
[app]
embedded = true

[notifications]
info-timeout-ms = 2500
max-visible = 5

[log]
filter = "shellgui=trace"
"#,
	)
	.unwrap();

	assert!(config.app.embedded);
	assert_eq!(config.notifications.info_timeout, Duration::from_millis(2500));
	assert_eq!(config.notifications.max_visible, 5);
	assert_eq!(config.notifications.auto_hide_timeout, Duration::from_secs(15));
	assert_eq!(config.log.filter.as_deref(), Some("shellgui=trace"));
	assert_eq!(config.log.directory, None);
}

#[test]
fn unknown_keys_are_rejected() {
	let err = Config::parse("[notifications]\nmax-visable = 2\n").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn zero_visible_toasts_is_invalid() {
	let err = Config::parse("[notifications]\nmax-visible = 0\n").unwrap_err();
	assert!(matches!(err, ConfigError::Notifications(SettingsError::NoVisibleToasts)));
}

#[test]
fn zero_tick_interval_is_invalid() {
	let err = Config::parse("[notifications]\ntick-interval-ms = 0\n").unwrap_err();
	assert!(matches!(err, ConfigError::Notifications(SettingsError::ZeroTickInterval)));
}

#[test]
fn blank_log_filter_is_invalid() {
	let err = Config::parse("[log]\nfilter = \"  \"\n").unwrap_err();
	assert!(matches!(err, ConfigError::EmptyLogFilter));
}

#[test]
fn load_reads_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join(CONFIG_FILE);
	std::fs::write(&path, "[app]\nembedded = true\n").unwrap();

	let config = Config::load(&path).unwrap();
	assert!(config.app.embedded);
	assert_eq!(Config::discover(Some(&path)).unwrap(), config);
}

#[test]
fn load_reports_missing_file_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.toml");

	match Config::load(&path) {
		Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("expected I/O error, got {other:?}"),
	}
}

#[test]
fn settings_round_trip_as_milliseconds() {
	let rendered = toml::to_string(&Config::default()).unwrap();
	assert!(rendered.contains("info-timeout-ms = 5000"), "{rendered}");
	assert_eq!(Config::parse(&rendered).unwrap(), Config::default());
}
