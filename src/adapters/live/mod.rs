//! Live adapters for real external interactions.

pub mod command;

pub use command::LiveCommandRunner;
