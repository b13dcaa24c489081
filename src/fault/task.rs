//! Blackhole task lifecycle.
//!
//! ```text
//! Idle -> Applying -> Waiting -> Reverting -> Done
//!            |                       |
//!            +-------> Failed <------+
//! ```
//!
//! The whole rule set is compiled before the first rule is applied. Rules
//! are then applied one at a time, the task waits for the timeout or for
//! cancellation, and finally reverts the rules in the order they were
//! applied. There is no rollback: a failed apply leaves the earlier rules
//! installed and a failed revert leaves the remaining rules installed.
//! [`TaskRun::installed`] tells the caller what is left.

use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::compiler::RuleCompiler;
use super::executor::RuleExecutor;
use super::rule::CompiledRule;
use super::spec::FaultSpec;
use crate::error::BlackholeError;
use crate::ports::CommandRunner;

/// Lifecycle phase of one task invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started.
    Idle,
    /// Compiling and installing rules.
    Applying,
    /// Rules installed, waiting for the timer or cancellation.
    Waiting,
    /// Removing rules.
    Reverting,
    /// Every rule was applied and reverted.
    Done,
    /// Terminated with an error.
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Applying => "applying",
            Self::Waiting => "waiting",
            Self::Reverting => "reverting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What ended the waiting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The timeout elapsed.
    TimedOut,
    /// The caller cancelled the task.
    Cancelled,
}

/// Record of one task invocation.
#[derive(Debug)]
pub struct TaskRun {
    id: Uuid,
    phase: Phase,
    applied: Vec<CompiledRule>,
    reverted: usize,
    wait_outcome: Option<WaitOutcome>,
}

impl TaskRun {
    /// Creates an idle run with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Idle,
            applied: Vec::new(),
            reverted: 0,
            wait_outcome: None,
        }
    }

    /// Unique id of this run, attached to its log events.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Rules successfully applied, in apply order.
    #[must_use]
    pub fn applied(&self) -> &[CompiledRule] {
        &self.applied
    }

    /// Rules applied and not yet reverted.
    #[must_use]
    pub fn installed(&self) -> &[CompiledRule] {
        &self.applied[self.reverted..]
    }

    /// How the wait ended, once it has.
    #[must_use]
    pub fn wait_outcome(&self) -> Option<WaitOutcome> {
        self.wait_outcome
    }

    fn enter(&mut self, phase: Phase) {
        info!(from = %self.phase, to = %phase, "phase change");
        self.phase = phase;
    }
}

impl Default for TaskRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops the traffic described by a [`FaultSpec`] for a bounded time.
///
/// The iptables rule table is shared process-wide state; running two tasks
/// with overlapping targets at once is not supported.
pub struct BlackholeTask<'a> {
    runner: &'a dyn CommandRunner,
    spec: FaultSpec,
}

impl<'a> BlackholeTask<'a> {
    /// Creates a task issuing commands through `runner`.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, spec: FaultSpec) -> Self {
        Self { runner, spec }
    }

    /// Compiles the fault spec's targets without touching the firewall.
    ///
    /// # Errors
    ///
    /// Returns a validation or resolution error.
    pub fn rules(&self) -> Result<Vec<CompiledRule>, BlackholeError> {
        RuleCompiler::new(self.runner).compile(&self.spec.targets)
    }

    /// Runs the task to completion and returns its record.
    ///
    /// # Errors
    ///
    /// See [`BlackholeTask::execute_run`].
    pub async fn execute(&self, cancel: &CancellationToken) -> Result<TaskRun, BlackholeError> {
        let mut run = TaskRun::new();
        self.execute_run(&mut run, cancel).await?;
        Ok(run)
    }

    /// Applies every rule, waits for the timeout or `cancel`, then reverts
    /// every rule, recording progress in `run`.
    ///
    /// Cancellation is only observed while waiting. Without a timeout the
    /// task waits for `cancel` indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`BlackholeError::RunAlreadyStarted`] without touching `run`
    /// or the firewall if `run` is not [`Phase::Idle`]. Otherwise returns the
    /// first validation, resolution, apply or revert error. The run is left
    /// in [`Phase::Failed`] and [`TaskRun::installed`] lists the rules still
    /// present in the firewall.
    #[instrument(name = "task", skip_all, fields(run_id = %run.id()))]
    pub async fn execute_run(
        &self,
        run: &mut TaskRun,
        cancel: &CancellationToken,
    ) -> Result<(), BlackholeError> {
        if run.phase != Phase::Idle {
            return Err(BlackholeError::RunAlreadyStarted {
                id: run.id,
                phase: run.phase.to_string(),
            });
        }
        let result = self.drive(run, cancel).await;
        match &result {
            Ok(()) => run.enter(Phase::Done),
            Err(err) => {
                run.enter(Phase::Failed);
                if !run.installed().is_empty() {
                    warn!(installed = run.installed().len(), error = %err, "rules left installed");
                }
            }
        }
        result
    }

    async fn drive(
        &self,
        run: &mut TaskRun,
        cancel: &CancellationToken,
    ) -> Result<(), BlackholeError> {
        run.enter(Phase::Applying);
        let timeout = self.spec.timeout()?;
        let rules = self.rules()?;

        let executor = RuleExecutor::new(self.runner);
        for rule in rules {
            executor.apply(&rule)?;
            info!(%rule, "applied rule");
            run.applied.push(rule);
        }

        run.enter(Phase::Waiting);
        let outcome = wait(timeout, cancel).await;
        info!(?outcome, "wait finished");
        run.wait_outcome = Some(outcome);

        run.enter(Phase::Reverting);
        while let Some(rule) = run.applied.get(run.reverted) {
            executor.revert(rule)?;
            info!(%rule, "reverted rule");
            run.reverted += 1;
        }
        Ok(())
    }
}

/// Races the optional timer against cancellation.
async fn wait(timeout: Option<Duration>, cancel: &CancellationToken) -> WaitOutcome {
    match timeout {
        Some(duration) => tokio::select! {
            biased;
            () = cancel.cancelled() => WaitOutcome::Cancelled,
            () = tokio::time::sleep(duration) => WaitOutcome::TimedOut,
        },
        None => {
            cancel.cancelled().await;
            WaitOutcome::Cancelled
        }
    }
}
