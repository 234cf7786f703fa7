//! Shell GUI notification host.
//!
//! Reads one command per line from stdin and drives a notification center:
//! `info`, `warn` and `error` go through the requisition bus, `ask` shows a
//! toast with action buttons, and `list`/`status` print the current views.
//! With `--embedded` show requests are forwarded to the host as JSON lines.

mod app;
mod cli;
mod commands;
mod logging;
mod status_bar;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use shellgui_config::Config;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let config = Config::discover(cli.config.as_deref()).context("loading configuration")?;

	logging::setup(cli.verbose, &config.log);

	let embedded = cli.embedded || config.app.embedded;
	info!(embedded, "starting shellgui");
	app::run(config, embedded).await
}
