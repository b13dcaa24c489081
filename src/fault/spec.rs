//! Declarative fault specification as received from the caller.
//!
//! Keys follow the task API's PascalCase layout:
//!
//! ```yaml
//! Type: Blackhole
//! Timeout: 10m
//! Targets:
//!   - Host: 10.34.4.60
//!     Direction: INPUT
//!     Protocol: tcp
//!     DstPorts: "8080"
//! ```
//!
//! Target fields are kept as raw strings; they are validated when the
//! target is compiled into rules.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{SpecLoadError, TimeoutError, ValidationError, MAX_TIMEOUT};

/// One or more `<digits><unit>` components, e.g. `90s` or `1h30m`.
static TIMEOUT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:ns|us|ms|s|m|h))+$").expect("timeout pattern is valid")
});

/// A blackhole fault: the traffic to drop and for how long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FaultSpec {
    /// Task type label, informational only.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Optional duration such as `250ms`, `10m` or `1h30m`. Empty means no timer.
    pub timeout: String,
    /// Traffic to block, compiled in order.
    pub targets: Vec<Target>,
}

/// One traffic selector to block.
///
/// Must carry at least one of `host`, `dst_ports` or `src_ports`. Ports
/// without a host block those ports for every host; a host without ports
/// blocks all traffic to and from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Target {
    /// Address (`10.34.4.60`), address block (`192.168.0.0/24`) or domain name.
    pub host: String,
    /// One of `INPUT`, `OUTPUT`, `BOTH`; blank means `BOTH`.
    pub direction: String,
    /// One of `tcp`, `udp`, `icmp`, `all`; blank means `all`.
    pub protocol: String,
    /// Destination port (`8080`) or range (`4530:6740`).
    pub dst_ports: String,
    /// Source port (`8080`) or range (`4530:6740`).
    pub src_ports: String,
}

impl FaultSpec {
    /// Loads a fault spec from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, SpecLoadError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| SpecLoadError::Read { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| SpecLoadError::Parse { path: path.to_path_buf(), source })
    }

    /// Parses the timeout. `None` means the task waits only for cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeout`] if the value is not a
    /// sequence of `ns`, `us`, `ms`, `s`, `m` or `h` components, or is longer
    /// than [`MAX_TIMEOUT`].
    pub fn timeout(&self) -> Result<Option<Duration>, ValidationError> {
        let value = self.timeout.trim();
        if value.is_empty() {
            return Ok(None);
        }
        parse_timeout(value)
            .map(Some)
            .map_err(|source| ValidationError::InvalidTimeout { value: value.to_string(), source })
    }
}

fn parse_timeout(value: &str) -> Result<Duration, TimeoutError> {
    // humantime also knows days, weeks, months and years; `1M` is a month there.
    if !TIMEOUT_PATTERN.is_match(value) {
        return Err(TimeoutError::Format);
    }
    let duration = humantime::parse_duration(value)?;
    if duration > MAX_TIMEOUT {
        return Err(TimeoutError::TooLong);
    }
    Ok(duration)
}

impl Target {
    /// Returns `true` when the target selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.host.is_empty() && self.dst_ports.is_empty() && self.src_ports.is_empty()
    }
}
