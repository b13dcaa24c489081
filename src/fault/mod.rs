//! The blackhole fault: compile a [`FaultSpec`] into iptables drop rules,
//! keep them installed for a bounded time, then remove them.
//!
//! Data flows leaf-first through the submodules:
//!
//! - [`resolver`] turns host strings into IPv4/CIDR literals.
//! - [`compiler`] validates targets and expands them into [`CompiledRule`]s.
//! - [`executor`] installs and removes one rule via `iptables`.
//! - [`task`] drives apply, wait, and revert.

pub mod compiler;
pub mod executor;
pub mod resolver;
pub mod rule;
pub mod spec;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;

pub use compiler::RuleCompiler;
pub use executor::RuleExecutor;
pub use resolver::HostResolver;
pub use rule::{Action, Chain, CompiledRule, Direction, PortSpec, Protocol};
pub use spec::{FaultSpec, Target};
pub use task::{BlackholeTask, Phase, TaskRun, WaitOutcome};
