//! Recording adapter for the `CommandRunner` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::BoxError;
use crate::ports::{CommandOutput, CommandRunner};

/// Records command invocations while delegating to an inner implementation.
pub struct RecordingCommandRunner {
    inner: Box<dyn CommandRunner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingCommandRunner {
    /// Creates a new recording runner wrapping the given implementation.
    pub fn new(inner: Box<dyn CommandRunner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct CommandInput<'a> {
    name: &'a str,
    args: &'a [String],
}

impl CommandRunner for RecordingCommandRunner {
    fn run_command(&self, name: &str, args: &[String]) -> Result<CommandOutput, BoxError> {
        let result = self.inner.run_command(name, args);
        let input = CommandInput { name, args };
        record_result(&self.recorder, "command", "run", &input, &result);
        result
    }
}
