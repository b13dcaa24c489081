//! Compiles fault targets into ordered drop rules.

use tracing::debug;

use super::resolver::HostResolver;
use super::rule::{CompiledRule, Direction, PortSpec, Protocol};
use super::spec::Target;
use crate::error::{BlackholeError, ValidationError};
use crate::ports::CommandRunner;

/// Validates targets and expands them into [`CompiledRule`]s.
pub struct RuleCompiler<'a> {
    resolver: HostResolver<'a>,
}

impl<'a> RuleCompiler<'a> {
    /// Creates a compiler resolving host names through `runner`.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { resolver: HostResolver::new(runner) }
    }

    /// Compiles every target in order and concatenates their rules.
    ///
    /// Either the whole list compiles or nothing is returned.
    ///
    /// # Errors
    ///
    /// Returns the first validation or resolution error encountered.
    pub fn compile(&self, targets: &[Target]) -> Result<Vec<CompiledRule>, BlackholeError> {
        let mut rules = Vec::new();
        for target in targets {
            rules.extend(self.compile_target(target)?);
        }
        Ok(rules)
    }

    /// Compiles one target into one rule per chain, `INPUT` before `OUTPUT`.
    ///
    /// `INPUT` rules match the resolved addresses as sources and `OUTPUT`
    /// rules as destinations. All addresses of a host share one rule.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty target or a bad direction,
    /// protocol or port value, and a resolution error if the host does not
    /// resolve.
    pub fn compile_target(&self, target: &Target) -> Result<Vec<CompiledRule>, BlackholeError> {
        if target.is_empty() {
            return Err(ValidationError::MissingMatch.into());
        }

        let hosts =
            if target.host.is_empty() { Vec::new() } else { self.resolver.resolve(&target.host)? };

        let direction = Direction::parse(&target.direction)?;
        let protocol = Protocol::parse(&target.protocol)?;
        let dst_ports = PortSpec::parse(&target.dst_ports, "destination")?;
        let src_ports = PortSpec::parse(&target.src_ports, "source")?;

        let rules: Vec<CompiledRule> = direction
            .chains()
            .iter()
            .map(|&chain| CompiledRule {
                chain,
                hosts: hosts.clone(),
                protocol,
                dst_ports: dst_ports.clone(),
                src_ports: src_ports.clone(),
            })
            .collect();
        debug!(host = %target.host, rules = rules.len(), "compiled target");
        Ok(rules)
    }
}
