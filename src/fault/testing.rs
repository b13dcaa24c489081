//! Scripted command runner for blackhole tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::BoxError;
use crate::ports::{CommandOutput, CommandRunner};

/// Answers `dig` from a fixed table and accepts `iptables` calls, failing
/// the n-th one on request. Every invocation is logged as `"name args.."`.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    dig: HashMap<String, String>,
    fail_iptables_at: Option<usize>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_dig(mut self, host: &str, stdout: &str) -> Self {
        self.dig.insert(host.to_string(), stdout.to_string());
        self
    }

    /// Fail the `n`-th (1-indexed) iptables invocation.
    pub(crate) fn failing_iptables_at(mut self, n: usize) -> Self {
        self.fail_iptables_at = Some(n);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn iptables_calls(&self) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.starts_with("iptables ")).collect()
    }
}

fn output(exit_code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput { exit_code, stdout: stdout.to_string(), stderr: stderr.to_string() }
}

impl CommandRunner for ScriptedRunner {
    fn run_command(&self, name: &str, args: &[String]) -> Result<CommandOutput, BoxError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(format!("{name} {}", args.join(" ")));

        match name {
            "dig" => match args.last().and_then(|host| self.dig.get(host)) {
                Some(stdout) => Ok(output(0, stdout, "")),
                None => Ok(output(9, "", ";; connection timed out; no servers could be reached")),
            },
            "iptables" => {
                let count = calls.iter().filter(|c| c.starts_with("iptables ")).count();
                if self.fail_iptables_at == Some(count) {
                    let stderr = "iptables: Bad rule (does a matching rule exist in that chain?).";
                    Ok(output(1, "", stderr))
                } else {
                    Ok(output(0, "", ""))
                }
            }
            other => Err(format!("unexpected program '{other}'").into()),
        }
    }
}
