//! CLI command definitions and dispatch.

pub mod ports;
pub mod resources;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use preflight_common::config::PreflightConfig;
use preflight_common::constants::BIN_NAME;

/// Preflight checks for Komodo-managed Compose deployments.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// TOML file overriding default file locations and expected variables.
    #[arg(long, global = true, env = "PREFLIGHT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the structure of a Komodo resource file.
    #[command(alias = "toml")]
    Resources(resources::ResourcesArgs),
    /// Scan compose files for host port conflicts.
    Ports(ports::PortsArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the command
/// hits an I/O failure it cannot report as a check result.
pub fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => PreflightConfig::load(path)?,
        None => PreflightConfig::default(),
    };

    match cli.command {
        Command::Resources(args) => resources::execute(args, &config.resources),
        Command::Ports(args) => ports::execute(args, config.ports),
    }
}
