//! Recording session owning the cassette recorder for one invocation.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::recorder::CassetteRecorder;

/// File name of the command cassette inside a session directory.
pub const COMMAND_CASSETTE: &str = "command.cassette.yaml";

/// Manages the `CassetteRecorder` for a recording session.
///
/// Every command invocation is captured into `<dir>/command.cassette.yaml`.
pub struct RecordingSession {
    /// Recorder for command interactions.
    pub command: Arc<Mutex<CassetteRecorder>>,
    /// Output directory containing the cassette file.
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session writing into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A command cassette already exists in the directory
    /// - The directory cannot be created
    pub fn new(output_dir: PathBuf) -> Result<Self, String> {
        let path = output_dir.join(COMMAND_CASSETTE);
        if path.exists() {
            return Err(format!("Cassette file already exists: {}", path.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let recorder =
            CassetteRecorder::new(path, format!("{timestamp}-command"), get_commit_hash());

        Ok(Self { command: Arc::new(Mutex::new(recorder)), output_dir })
    }

    /// Finish the recorder and write the cassette file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording adapter is still alive or the
    /// cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.command)
            .map_err(|_| "Recording adapter for command still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock for command poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write command cassette: {e}"))?;
        Ok(self.output_dir)
    }
}

/// Get the current git commit hash, or "unknown" with a warning if unavailable.
fn get_commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    if let Some(h) = hash {
        h
    } else {
        warn!("could not get git commit hash, using 'unknown'");
        "unknown".to_string()
    }
}
