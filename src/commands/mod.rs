//! Command dispatch and handlers.

pub mod rules;
pub mod run;

use std::env;
use std::path::PathBuf;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// When `BLACKHOLE_REPLAY` names a cassette file, commands are served from
/// it instead of running real programs. Otherwise, when `BLACKHOLE_RECORD`
/// is set to a directory path, every command invocation is recorded to a
/// cassette in that directory.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let (ctx, session) = if let Ok(path) = env::var("BLACKHOLE_REPLAY") {
        (ServiceContext::replaying(&PathBuf::from(path))?, None)
    } else if let Ok(path) = env::var("BLACKHOLE_RECORD") {
        let (ctx, session) = ServiceContext::recording_at(PathBuf::from(path))?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    let result = dispatch_with_context(command, &ctx);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Run { spec, timeout } => run::run_with_context(ctx, spec, timeout.as_deref()),
        Command::Rules { spec } => rules::run_with_context(ctx, spec),
    }
}

/// Finish a recording session and log the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    tracing::info!(dir = %output_dir.display(), "recording saved");
    Ok(())
}
