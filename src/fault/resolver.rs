//! Host resolution: literal IPv4/CIDR extraction or a `dig` lookup.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::BlackholeError;
use crate::ports::{run_checked, CommandRunner};

/// An IPv4 address with an optional `/prefix`.
static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(/\d{0,2})?").expect("IPv4 pattern is valid")
});

/// Turns a host string into concrete IPv4 address or CIDR literals.
pub struct HostResolver<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> HostResolver<'a> {
    /// Creates a resolver that looks names up through `runner`.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Resolves `host` to its addresses, in order of appearance.
    ///
    /// A host containing IPv4 literals is scanned directly, so several
    /// literals separated by arbitrary text all count. Anything else is
    /// looked up with `dig +short`.
    ///
    /// # Errors
    ///
    /// Returns [`BlackholeError::Resolution`] if the lookup fails and
    /// [`BlackholeError::NoAddresses`] if it yields no addresses.
    pub fn resolve(&self, host: &str) -> Result<Vec<String>, BlackholeError> {
        if IPV4_PATTERN.is_match(host) {
            return Ok(extract_addresses(host));
        }

        let args = vec!["+short".to_string(), host.to_string()];
        let output = run_checked(self.runner, "dig", &args)
            .map_err(|source| BlackholeError::Resolution { host: host.to_string(), source })?;

        let addresses = extract_addresses(&output.stdout);
        if addresses.is_empty() {
            return Err(BlackholeError::NoAddresses { host: host.to_string() });
        }
        debug!(host, ?addresses, "resolved host");
        Ok(addresses)
    }
}

/// Every IPv4/CIDR literal in `text`, first occurrence order, duplicates dropped.
#[must_use]
pub fn extract_addresses(text: &str) -> Vec<String> {
    let mut addresses: Vec<String> = Vec::new();
    for found in IPV4_PATTERN.find_iter(text) {
        if !addresses.iter().any(|a| a == found.as_str()) {
            addresses.push(found.as_str().to_string());
        }
    }
    addresses
}
