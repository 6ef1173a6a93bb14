mod cli;
mod command_handlers;
mod digest;
mod error;
mod fetch;
mod formula;
mod installer;
mod platform;
mod receipt;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::formula::Formula;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let formula = match &cli.formula {
        Some(path) => Formula::load(path)?,
        None => Formula::xnx()?,
    };
    let ctx = command_handlers::Context::from_cli(&cli)?;
    command_handlers::dispatch::dispatch(cli.command, &formula, &ctx)?;
    Ok(())
}
