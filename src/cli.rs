//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `blackhole`.
#[derive(Debug, Parser)]
#[command(
    name = "blackhole",
    version,
    about = "Drop network traffic with iptables for a bounded time"
)]
pub struct Cli {
    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "BLACKHOLE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Install the drop rules, wait, then remove them.
    Run {
        /// Fault spec file (YAML or JSON).
        spec: PathBuf,
        /// Override the fault spec's timeout (e.g. 500ms, 30s, 10m, 2h).
        #[arg(long)]
        timeout: Option<String>,
    },
    /// Print the compiled rules without touching the firewall.
    Rules {
        /// Fault spec file (YAML or JSON).
        spec: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_run_subcommand() {
        let cli = Cli::parse_from(["blackhole", "run", "fault.yaml", "--timeout", "30s"]);
        match cli.command {
            Command::Run { spec, timeout } => {
                assert_eq!(spec.to_str(), Some("fault.yaml"));
                assert_eq!(timeout.as_deref(), Some("30s"));
            }
            Command::Rules { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn parses_rules_subcommand_with_global_flags() {
        let cli = Cli::parse_from(["blackhole", "rules", "fault.yaml", "--json-logs"]);
        assert!(matches!(cli.command, Command::Rules { .. }));
        assert!(cli.json_logs);
    }

    #[test]
    fn run_requires_spec() {
        assert!(Cli::try_parse_from(["blackhole", "run"]).is_err());
    }
}
