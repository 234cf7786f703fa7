use std::fs::OpenOptions;
use std::path::PathBuf;

use shellgui_config::LogConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured filter. Logs go to a per-process file
/// when `SHELLGUI_LOG_DIR` or `[log] directory` is set, to stderr otherwise,
/// since stdout carries the console UI.
pub fn setup(verbose: bool, config: &LogConfig) {
	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| match (&config.filter, verbose) {
			(Some(filter), _) => EnvFilter::new(filter),
			(None, true) => EnvFilter::new("shellgui=trace,debug"),
			(None, false) => EnvFilter::new("shellgui=info,warn"),
		})
	};

	let log_dir = std::env::var("SHELLGUI_LOG_DIR")
		.ok()
		.map(PathBuf::from)
		.or_else(|| config.directory.clone());
	if let Some(log_dir) = log_dir
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("shellgui.{}.log", std::process::id()));
		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_span_events(FmtSpan::CLOSE)
				.with_target(true);

			tracing_subscriber::registry()
				.with(filter())
				.with(file_layer)
				.init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(std::io::stderr)
		.init();
}
