mod cli;
mod color;
mod config;
mod logging;
mod migrate;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::Config;
use migrate::RunSummary;
use output::{output_error, output_summary};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);

    if let Err(e) = logging::init() {
        eprintln!("{:#}", e);
    }

    match run(&cli) {
        Ok(summary) => {
            output_summary(&summary, cli.format);
            ExitCode::from(summary.exit_code())
        }
        Err(e) => {
            output_error(&e, cli.format);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_with_cli(cli);
    config.validate(cli.dry_run)?;

    migrate::run(&config, cli.dry_run)
}
