//! Record-replay round-trip integration test.
//!
//! 1. Run a blackhole task against a fake runner wrapped in a recording adapter.
//! 2. Replay the cassette through `ServiceContext::replaying()`.
//! 3. Assert the replayed run applies and reverts the same rules.
//! 4. Replay a second time and assert determinism.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use blackhole::adapters::recording::RecordingCommandRunner;
use blackhole::cassette::format::Cassette;
use blackhole::cassette::recorder::CassetteRecorder;
use blackhole::context::ServiceContext;
use blackhole::error::BoxError;
use blackhole::fault::{BlackholeTask, FaultSpec, Phase, Target};
use blackhole::ports::{CommandOutput, CommandRunner};

/// Stands in for a host with `dig` and `iptables` available.
struct FakeHost;

impl CommandRunner for FakeHost {
    fn run_command(&self, name: &str, _args: &[String]) -> Result<CommandOutput, BoxError> {
        let stdout = if name == "dig" { "cache.internal.\n10.9.0.4\n" } else { "" };
        Ok(CommandOutput { exit_code: 0, stdout: stdout.into(), stderr: String::new() })
    }
}

fn spec() -> FaultSpec {
    FaultSpec {
        kind: "Blackhole".into(),
        timeout: String::new(),
        targets: vec![
            Target {
                host: "cache.internal".into(),
                protocol: "tcp".into(),
                dst_ports: "6379".into(),
                ..Target::default()
            },
            Target {
                src_ports: "9000:9100".into(),
                direction: "OUTPUT".into(),
                ..Target::default()
            },
        ],
    }
}

async fn execute(runner: &dyn CommandRunner) -> Vec<String> {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let run = BlackholeTask::new(runner, spec()).execute(&cancel).await.unwrap();
    assert_eq!(run.phase(), Phase::Done);
    assert!(run.installed().is_empty());
    run.applied().iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn record_then_replay_produces_identical_runs() {
    let dir = std::env::temp_dir().join("blackhole_record_replay_test");
    std::fs::create_dir_all(&dir).unwrap();
    let cassette_path = dir.join("command.cassette.yaml");

    // --- Phase 1: Record ---
    let recorder =
        Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "roundtrip", "abc123")));
    let recorded = {
        let runner = RecordingCommandRunner::new(Box::new(FakeHost), Arc::clone(&recorder));
        execute(&runner).await
    };
    let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
    recorder.finish().expect("recording should succeed");

    assert_eq!(
        recorded,
        vec![
            "INPUT -s 10.9.0.4 -p tcp -dport 6379 -j DROP",
            "OUTPUT -d 10.9.0.4 -p tcp -dport 6379 -j DROP",
            "OUTPUT -p all -sport 9000:9100 -j DROP",
        ]
    );

    // One dig, three applies, three reverts.
    let cassette = Cassette::from_path(&cassette_path).unwrap();
    assert_eq!(cassette.interactions.len(), 7);
    assert_eq!(cassette.interactions[0].input["name"], "dig");
    assert_eq!(cassette.interactions[1].input["args"][0], "-A");
    assert_eq!(cassette.interactions[4].input["args"][0], "-D");
    let args = |seq: usize| cassette.interactions[seq].input["args"].as_array().unwrap().clone();
    assert_eq!(args(1)[1..], args(4)[1..]);

    // --- Phase 2: Replay ---
    let ctx1 = ServiceContext::replaying(&cassette_path).unwrap();
    let replayed1 = execute(ctx1.commands.as_ref()).await;
    assert_eq!(replayed1, recorded, "replay mismatch");

    // --- Phase 3: Replay a second time, check determinism ---
    let ctx2 = ServiceContext::replaying(&cassette_path).unwrap();
    let replayed2 = execute(ctx2.commands.as_ref()).await;
    assert_eq!(replayed1, replayed2, "determinism: runs differ between replays");

    // Cleanup
    let _ = std::fs::remove_dir_all(&dir);
}
