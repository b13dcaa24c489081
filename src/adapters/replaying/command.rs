//! Replaying adapter for the `CommandRunner` port.

use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::BoxError;
use crate::ports::command::{CommandOutput, CommandRunner};

/// Replays recorded command results from a cassette.
///
/// Each call must match the next recorded invocation exactly; a divergence
/// means the code under replay no longer issues the commands it did when
/// the cassette was recorded.
pub struct ReplayingCommandRunner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingCommandRunner {
    /// Creates a new replaying runner from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    /// Number of recorded invocations not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replayer.lock().expect("replayer lock poisoned").remaining("command", "run")
    }
}

impl CommandRunner for ReplayingCommandRunner {
    fn run_command(&self, name: &str, args: &[String]) -> Result<CommandOutput, BoxError> {
        let interaction = self
            .replayer
            .lock()
            .expect("replayer lock poisoned")
            .next_interaction("command", "run");

        let expected = serde_json::json!({ "name": name, "args": args });
        assert!(
            interaction.input == expected,
            "Cassette mismatch at seq={}: recorded invocation {} but got {expected}",
            interaction.seq,
            interaction.input
        );

        replay_result(&interaction.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    fn dig_interaction(output: serde_json::Value) -> Interaction {
        Interaction {
            seq: 0,
            port: "command".into(),
            method: "run".into(),
            input: json!({"name": "dig", "args": ["+short", "example.com"]}),
            output,
        }
    }

    fn dig_args() -> Vec<String> {
        vec!["+short".into(), "example.com".into()]
    }

    #[test]
    fn replaying_command_run() {
        let replayer = make_replayer(vec![dig_interaction(
            json!({"Ok": {"exit_code": 0, "stdout": "93.184.216.34\n", "stderr": ""}}),
        )]);
        let runner = ReplayingCommandRunner::new(replayer);
        assert_eq!(runner.remaining(), 1);
        let result = runner.run_command("dig", &dig_args()).unwrap();
        assert_eq!(runner.remaining(), 0);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "93.184.216.34\n");
    }

    #[test]
    fn replaying_command_run_error() {
        let replayer = make_replayer(vec![dig_interaction(json!({"Err": "command not found"}))]);
        let runner = ReplayingCommandRunner::new(replayer);
        let err = runner.run_command("dig", &dig_args()).unwrap_err();
        assert_eq!(err.to_string(), "command not found");
    }

    #[test]
    #[should_panic(expected = "Cassette mismatch")]
    fn diverging_invocation_panics() {
        let replayer = make_replayer(vec![dig_interaction(
            json!({"Ok": {"exit_code": 0, "stdout": "", "stderr": ""}}),
        )]);
        let runner = ReplayingCommandRunner::new(replayer);
        let _ = runner.run_command("dig", &["+short".into(), "other.example".into()]);
    }
}
