//! Applies and reverts compiled rules through `iptables`.

use tracing::debug;

use super::rule::{Action, CompiledRule};
use crate::error::BlackholeError;
use crate::ports::{run_checked, CommandRunner};

/// Issues `iptables -A` / `iptables -D` for single rules.
pub struct RuleExecutor<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> RuleExecutor<'a> {
    /// Creates an executor running iptables through `runner`.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Installs `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`BlackholeError::Command`] if iptables fails.
    pub fn apply(&self, rule: &CompiledRule) -> Result<(), BlackholeError> {
        self.iptables(Action::Apply, rule)
    }

    /// Removes `rule` using the same match criteria it was installed with.
    ///
    /// # Errors
    ///
    /// Returns [`BlackholeError::Command`] if iptables fails.
    pub fn revert(&self, rule: &CompiledRule) -> Result<(), BlackholeError> {
        self.iptables(Action::Revert, rule)
    }

    fn iptables(&self, action: Action, rule: &CompiledRule) -> Result<(), BlackholeError> {
        let args = rule.command_args(action);
        debug!(action = action.flag(), %rule, "running iptables");
        run_checked(self.runner, "iptables", &args).map_err(|source| BlackholeError::Command {
            context: match action {
                Action::Apply => "applying rule",
                Action::Revert => "reverting rule",
            },
            rule: rule.to_string(),
            source,
        })?;
        Ok(())
    }
}
