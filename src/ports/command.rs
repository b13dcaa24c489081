//! Command runner port for invoking external programs (`dig`, `iptables`).

use serde::{Deserialize, Serialize};

use crate::error::BoxError;

/// The output of an external program invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// The exit code of the process.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` when the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external programs.
///
/// Abstracting process execution allows deterministic replay by recording
/// and replaying command outputs during cassette playback.
pub trait CommandRunner: Send + Sync {
    /// Runs `name` with `args` (no shell involved) and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or fails to execute.
    fn run_command(&self, name: &str, args: &[String]) -> Result<CommandOutput, BoxError>;
}

/// Runs a command and treats a non-zero exit status as an error.
///
/// # Errors
///
/// Returns the runner's error, or an error naming the program, its exit
/// status and trimmed stderr when the process exits unsuccessfully.
pub fn run_checked(
    runner: &dyn CommandRunner,
    name: &str,
    args: &[String],
) -> Result<CommandOutput, BoxError> {
    let output = runner.run_command(name, args)?;
    if output.success() {
        Ok(output)
    } else {
        Err(format!(
            "running '{name} {}' exited with status {}: {}",
            args.join(" "),
            output.exit_code,
            output.stderr.trim()
        )
        .into())
    }
}
