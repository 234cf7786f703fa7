use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "shellgui")]
#[command(about = "Notification center host driven by commands on stdin")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to $XDG_CONFIG_HOME/shellgui/config.toml)
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Forward notifications to a host instead of showing them
	#[arg(long)]
	pub embedded: bool,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,
}
