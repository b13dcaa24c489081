//! `blackhole rules` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::error::display_chain;
use crate::fault::{FaultSpec, RuleCompiler};

/// Compile the fault spec at `spec_path` and return one canonical rule per line.
///
/// The timeout is validated and host names are still resolved, but
/// iptables is never invoked.
///
/// # Errors
///
/// Returns an error string if the fault spec cannot be loaded or compiled.
pub fn render(ctx: &ServiceContext, spec_path: &Path) -> Result<Vec<String>, String> {
    let spec = FaultSpec::from_path(spec_path).map_err(|e| display_chain(&e))?;
    spec.timeout().map_err(|e| display_chain(&e))?;
    let rules = RuleCompiler::new(ctx.commands.as_ref())
        .compile(&spec.targets)
        .map_err(|e| display_chain(&e))?;
    Ok(rules.iter().map(ToString::to_string).collect())
}

/// Execute the `rules` command.
///
/// # Errors
///
/// Returns an error string if the fault spec cannot be loaded or compiled.
pub fn run_with_context(ctx: &ServiceContext, spec_path: &Path) -> Result<(), String> {
    for line in render(ctx, spec_path)? {
        println!("{line}");
    }
    Ok(())
}
