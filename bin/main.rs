use clap::Parser;
use gexf_render::{
	cli::{Cli, CliCommand, DumpConfigArgs},
	error::Error,
	logging::{self, APPV},
	pipeline, settings,
};
use std::process::ExitCode;
use tracing::{error, trace};

fn main() -> ExitCode {
	match inner_main() {
		Err(e @ Error::Slicer(_)) => {
			error!("{e}");
			error!("check that the input is a GEXF 1.3 document with graph mode=\"dynamic\"");
			ExitCode::FAILURE
		},
		Err(e) => {
			error!("{e}");
			ExitCode::FAILURE
		},
		Ok(_) => ExitCode::SUCCESS,
	}
}

fn inner_main() -> Result<(), Error> {
	let cli = Cli::parse();
	logging::init_tracing(cli.quiet, cli.verbose);

	match &cli.command {
		CliCommand::Render(args) => {
			trace!(target: APPV, "render args: {args:?}");
			pipeline::run_render(args)
		},
		CliCommand::Inspect(args) => {
			trace!(target: APPV, "inspect args: {args:?}");
			pipeline::run_inspect(args)
		},
		CliCommand::DumpConfig(DumpConfigArgs { output }) => {
			let settings = settings::Settings::default();
			match output {
				Some(path) => settings.save_to_file(path)?,
				None => println!("{}", toml::to_string_pretty(&settings).expect("Settings always serializes to TOML")),
			}
			Ok(())
		},
	}
}
