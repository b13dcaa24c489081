//! Structured iptables drop rules.
//!
//! A [`CompiledRule`] holds the match criteria only. The action token
//! (`-A` to apply, `-D` to revert) is prepended at the executor boundary,
//! so apply and revert always carry identical match criteria.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// A bare port or `low:high` range at the end of the value.
static PORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(:\d+)?$").expect("port pattern is valid"));

/// Traffic direction category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    /// Incoming traffic, matched on source address.
    Input,
    /// Outgoing traffic, matched on destination address.
    Output,
}

impl Chain {
    /// The iptables chain name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Output => "OUTPUT",
        }
    }

    /// Flag used to match the remote host on this chain.
    #[must_use]
    pub fn host_flag(self) -> &'static str {
        match self {
            Self::Input => "-s",
            Self::Output => "-d",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which chains a target applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `INPUT` only.
    Input,
    /// `OUTPUT` only.
    Output,
    /// `INPUT` then `OUTPUT`.
    Both,
}

impl Direction {
    /// Normalizes a direction case-insensitively; blank means [`Direction::Both`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDirection`] for any other value.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.to_ascii_uppercase().as_str() {
            "" | "BOTH" => Ok(Self::Both),
            "INPUT" => Ok(Self::Input),
            "OUTPUT" => Ok(Self::Output),
            _ => Err(ValidationError::InvalidDirection(value.to_string())),
        }
    }

    /// Chains to emit rules for, in emission order.
    #[must_use]
    pub fn chains(self) -> &'static [Chain] {
        match self {
            Self::Input => &[Chain::Input],
            Self::Output => &[Chain::Output],
            Self::Both => &[Chain::Input, Chain::Output],
        }
    }
}

/// Protocol to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// TCP only.
    Tcp,
    /// UDP only.
    Udp,
    /// ICMP only.
    Icmp,
    /// Every protocol.
    All,
}

impl Protocol {
    /// Normalizes a protocol case-insensitively; blank means [`Protocol::All`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProtocol`] for any other value.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            "icmp" => Ok(Self::Icmp),
            _ => Err(ValidationError::InvalidProtocol(value.to_string())),
        }
    }

    /// The iptables protocol name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Icmp => "icmp",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated single port or `low:high` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec(String);

impl PortSpec {
    /// Validates an optional port filter; blank means no filter.
    ///
    /// `field` names the filter in the error ("destination" or "source").
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPort`] when the value does not end in
    /// a port or port range.
    pub fn parse(value: &str, field: &'static str) -> Result<Option<Self>, ValidationError> {
        if value.is_empty() {
            Ok(None)
        } else if PORT_PATTERN.is_match(value) {
            Ok(Some(Self(value.to_string())))
        } else {
            Err(ValidationError::InvalidPort { field, value: value.to_string() })
        }
    }

    /// The port filter as passed to iptables.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether a rule is being installed or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append the rule (`-A`).
    Apply,
    /// Delete the rule (`-D`).
    Revert,
}

impl Action {
    /// The iptables action flag.
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Self::Apply => "-A",
            Self::Revert => "-D",
        }
    }
}

/// One concrete drop rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    /// Chain the rule is installed in.
    pub chain: Chain,
    /// Remote addresses to match; empty matches every host.
    pub hosts: Vec<String>,
    /// Protocol to match.
    pub protocol: Protocol,
    /// Destination port filter.
    pub dst_ports: Option<PortSpec>,
    /// Source port filter.
    pub src_ports: Option<PortSpec>,
}

impl CompiledRule {
    /// Match criteria as iptables arguments, without the action flag.
    #[must_use]
    pub fn match_args(&self) -> Vec<String> {
        let mut args = vec![self.chain.as_str().to_string()];
        if !self.hosts.is_empty() {
            args.push(self.chain.host_flag().to_string());
            args.push(self.hosts.join(","));
        }
        args.push("-p".to_string());
        args.push(self.protocol.as_str().to_string());
        if let Some(ports) = &self.dst_ports {
            args.push("-dport".to_string());
            args.push(ports.as_str().to_string());
        }
        if let Some(ports) = &self.src_ports {
            args.push("-sport".to_string());
            args.push(ports.as_str().to_string());
        }
        args.push("-j".to_string());
        args.push("DROP".to_string());
        args
    }

    /// Full iptables argument list for `action`.
    #[must_use]
    pub fn command_args(&self, action: Action) -> Vec<String> {
        let mut args = vec![action.flag().to_string()];
        args.extend(self.match_args());
        args
    }
}

impl fmt::Display for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.match_args().join(" "))
    }
}
