//! EDFS CLI Binary
//!
//! Runs one filesystem command per invocation: `edfs <command> <path>`.

use anyhow::Context;
use clap::Parser;
use edfs::config::ConfigLoader;
use edfs::logging::init_logging;
use edfs::tooling::{Cli, CliContext};
use std::process;

fn main() {
    // Missing or extra arguments exit non-zero here, before any command runs.
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    init_logging(&config.logging).context("failed to initialize logging")?;
    let context = CliContext::new(&config).context("failed to open tree store")?;
    Ok(context.run(cli))
}
