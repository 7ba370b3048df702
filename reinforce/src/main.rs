//! # reinforce
//!
//! Command-line front end for the REINFORCE trainer. Every subcommand prints
//! a JSON report on stdout and logs to stderr; the exit status is non-zero
//! when a check fails.

mod app;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use crate::app::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let passed = app::run(cli.command)?;
    Ok(if passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
