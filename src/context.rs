//! Service context bundling the port trait objects.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::live::LiveCommandRunner;
use crate::adapters::recording::RecordingCommandRunner;
use crate::adapters::replaying::ReplayingCommandRunner;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::ports::command::CommandRunner;

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Runner for `dig` and `iptables`.
    pub commands: Box<dyn CommandRunner>,
}

impl ServiceContext {
    /// Creates a live context that runs real programs.
    #[must_use]
    pub fn live() -> Self {
        Self { commands: Box::new(LiveCommandRunner) }
    }

    /// Creates a context around an arbitrary command runner.
    #[must_use]
    pub fn with_runner(commands: Box<dyn CommandRunner>) -> Self {
        Self { commands }
    }

    /// Creates a recording context that captures every command to a
    /// cassette in `dir`.
    ///
    /// The returned session must be finished after the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording session cannot be created.
    pub fn recording_at(dir: PathBuf) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(dir)?;
        let commands =
            RecordingCommandRunner::new(Box::new(LiveCommandRunner), Arc::clone(&session.command));
        Ok((Self { commands: Box::new(commands) }, session))
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::from_path(path)?;
        Ok(Self {
            commands: Box::new(ReplayingCommandRunner::new(CassetteReplayer::new(&cassette))),
        })
    }
}
