//! Error types for compiling, applying, and reverting blackhole rules.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by port implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A target or timeout that cannot be turned into rules.
///
/// Always raised before any rule is applied.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The target has neither a host nor any port filter.
    #[error("must specify at least one of Host, DstPorts, and/or SrcPorts")]
    MissingMatch,

    /// The direction is not one of INPUT, OUTPUT, BOTH or blank.
    #[error("invalid direction '{0}', must be one of {{INPUT, OUTPUT, BOTH}} or blank")]
    InvalidDirection(String),

    /// The protocol is not one of tcp, udp, icmp, all or blank.
    #[error("invalid protocol '{0}', must be one of {{tcp, udp, icmp, all}} or blank")]
    InvalidProtocol(String),

    /// A port filter is neither a single port nor a `low:high` range.
    #[error("invalid {field} port specified '{value}'")]
    InvalidPort {
        /// Which port filter was rejected ("destination" or "source").
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The timeout string could not be parsed as a duration.
    #[error("invalid timeout '{value}'")]
    InvalidTimeout {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        #[source]
        source: TimeoutError,
    },
}

/// Reason a timeout string was rejected.
#[derive(Debug, Error)]
pub enum TimeoutError {
    /// A component is not `<digits><unit>` with a supported unit.
    #[error("expected <number><unit> components with unit ns, us, ms, s, m or h")]
    Format,

    /// The duration parser rejected the value.
    #[error(transparent)]
    Parse(#[from] humantime::DurationError),

    /// The duration does not fit in the supported range.
    #[error("duration exceeds {max_hours}h", max_hours = MAX_TIMEOUT.as_secs() / 3600)]
    TooLong,
}

/// Longest accepted timeout, the range of a signed 64-bit nanosecond count.
pub const MAX_TIMEOUT: std::time::Duration = std::time::Duration::from_nanos(u64::MAX >> 1);

/// Terminal failure of one blackhole task invocation.
#[derive(Debug, Error)]
pub enum BlackholeError {
    /// The fault spec failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The host name lookup itself failed.
    #[error("resolving host name '{host}'")]
    Resolution {
        /// Host that was being resolved.
        host: String,
        /// Underlying command failure.
        #[source]
        source: BoxError,
    },

    /// The lookup succeeded but produced no IPv4 addresses.
    #[error("no addresses found for host '{host}'")]
    NoAddresses {
        /// Host that was being resolved.
        host: String,
    },

    /// The run record passed in has already been used.
    #[error("task run {id} already started (phase {phase})")]
    RunAlreadyStarted {
        /// Id of the reused run.
        id: uuid::Uuid,
        /// Phase the run was found in.
        phase: String,
    },

    /// An iptables invocation failed while applying or reverting a rule.
    #[error("{context} '{rule}'")]
    Command {
        /// "applying rule" or "reverting rule".
        context: &'static str,
        /// Canonical form of the rule involved.
        rule: String,
        /// Underlying command failure.
        #[source]
        source: BoxError,
    },
}

impl BlackholeError {
    /// Returns `true` when the error was raised before any rule was applied,
    /// so the firewall was left untouched.
    #[must_use]
    pub fn is_pre_apply(&self) -> bool {
        !matches!(self, Self::Command { .. })
    }
}

/// A fault spec file that could not be loaded.
#[derive(Debug, Error)]
pub enum SpecLoadError {
    /// The file could not be read.
    #[error("failed to read fault spec {}", path.display())]
    Read {
        /// Path of the spec file.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid YAML or JSON fault spec.
    #[error("failed to parse fault spec {}", path.display())]
    Parse {
        /// Path of the spec file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Renders an error and its full `source()` chain on one line.
#[must_use]
pub fn display_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}
