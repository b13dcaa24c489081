//! Live command runner using `std::process::Command`.

use std::process::Command;

use tracing::trace;

use crate::error::BoxError;
use crate::ports::command::{CommandOutput, CommandRunner};

/// Live command runner that spawns programs directly, without a shell.
pub struct LiveCommandRunner;

impl CommandRunner for LiveCommandRunner {
    fn run_command(&self, name: &str, args: &[String]) -> Result<CommandOutput, BoxError> {
        trace!(program = name, ?args, "spawning");
        let output = Command::new(name)
            .args(args)
            .output()
            .map_err(|e| format!("failed to spawn '{name}': {e}"))?;
        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
