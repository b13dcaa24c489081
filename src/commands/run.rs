//! `blackhole run` command.

use std::path::Path;

use tracing::error;

use crate::context::ServiceContext;
use crate::error::display_chain;
use crate::fault::{BlackholeTask, FaultSpec, TaskRun, WaitOutcome};
use crate::shutdown::create_shutdown_token;

/// Execute the `run` command: apply, wait for the timeout or a signal, revert.
///
/// `timeout` replaces the fault spec's own timeout when given.
///
/// # Errors
///
/// Returns an error string if the fault spec cannot be loaded or the task fails.
/// Rules still installed after a failure are logged individually.
pub fn run_with_context(
    ctx: &ServiceContext,
    spec_path: &Path,
    timeout: Option<&str>,
) -> Result<(), String> {
    let mut spec = FaultSpec::from_path(spec_path).map_err(|e| display_chain(&e))?;
    if let Some(timeout) = timeout {
        spec.timeout = timeout.to_string();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;

    runtime.block_on(async {
        let cancel = create_shutdown_token();
        let task = BlackholeTask::new(ctx.commands.as_ref(), spec);
        let mut run = TaskRun::new();

        match task.execute_run(&mut run, &cancel).await {
            Ok(()) => {
                let ended = match run.wait_outcome() {
                    Some(WaitOutcome::TimedOut) => "timed out",
                    Some(WaitOutcome::Cancelled) | None => "cancelled",
                };
                println!("blackhole {ended}: applied and reverted {} rules", run.applied().len());
                Ok(())
            }
            Err(err) => {
                for rule in run.installed() {
                    error!(%rule, "rule still installed");
                }
                Err(display_chain(&err))
            }
        }
    })
}
