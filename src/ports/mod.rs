//! Port traits defining external boundaries.
//!
//! The blackhole task touches the outside world only through these traits.
//! Implementations live in `src/adapters/`.

pub mod command;

pub use command::{run_checked, CommandOutput, CommandRunner};
