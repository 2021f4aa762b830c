//! The overall command-line interface for gexf-render: global verbosity
//! flags plus the `render`, `inspect` and `dump-config` subcommands.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
	/// Global verbosity (-v, -vv).
	///
	/// Levels:
	///  - info enabled by default
	///  - -v for debug
	///  - -vv for trace
	#[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
	pub verbose: u8,

	/// Quiet mode: suppress all but warnings and errors.
	#[arg(short = 'q', long, action = clap::ArgAction::SetTrue, default_value_t = false, global = true)]
	pub quiet: bool,

	#[command(subcommand)]
	pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
	/// Slices, lays out and rasterizes a dynamic-graph document into a PNG
	/// frame sequence.
	Render(RenderArgs),
	/// Parses a document and prints its attribute schema and snapshot count
	/// without rendering anything.
	Inspect(InspectArgs),
	/// Prints the resolved default settings as TOML, for use as a starting
	/// `--config` file.
	DumpConfig(DumpConfigArgs),
}

#[derive(Debug, Args)]
pub struct RenderArgs {
	/// Path to the input GEXF 1.3 document.
	#[arg(long)]
	pub input: PathBuf,

	/// Directory frames are written into, as `frame-00000.png`, `frame-00001.png`, ...
	#[arg(long)]
	pub output: PathBuf,

	/// Optional TOML settings file; CLI flags below override its values.
	#[arg(long)]
	pub config: Option<PathBuf>,

	/// Window length, in the document's own time units. Defaults to a
	/// document-derived window when omitted.
	#[arg(long)]
	pub range: Option<f64>,

	/// Window step, in the document's own time units.
	#[arg(long)]
	pub step: Option<f64>,

	#[arg(long, default_value_t = 1600)]
	pub width: u32,

	#[arg(long, default_value_t = 1200)]
	pub height: u32,

	#[arg(long, default_value_t = 96.0)]
	pub dpi: f64,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
	#[arg(long)]
	pub input: PathBuf,

	#[arg(long)]
	pub range: Option<f64>,

	#[arg(long)]
	pub step: Option<f64>,
}

#[derive(Debug, Args)]
pub struct DumpConfigArgs {
	/// Write to this path instead of stdout.
	#[arg(long)]
	pub output: Option<PathBuf>,
}
