//! Network blackhole fault injection.
//!
//! Compiles a declarative [`fault::FaultSpec`] into iptables drop rules,
//! keeps them installed until a timeout elapses or the caller cancels, and
//! then removes them in the order they were installed.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod fault;
pub mod ports;
pub mod shutdown;
pub mod telemetry;

use clap::Parser;

use crate::telemetry::{init_tracing, TracingConfig};

/// Run the CLI with the provided arguments.
///
/// Loads an optional `.env` file, installs logging, and dispatches the
/// parsed command.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let _ = dotenvy::dotenv();
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    init_tracing(&TracingConfig { log_level: cli.log_level.clone(), json_logs: cli.json_logs })?;
    commands::dispatch(&cli.command)
}
