//! ppa-splitter command-line entry point

use clap::Parser;
use ppa_splitter_cli::commands::Commands;
use std::process::ExitCode;

/// Split annotated corpora into train, test and dev datasets
#[derive(Debug, Parser)]
#[command(name = "ppa-splitter", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
