//! Binary entrypoint for the `blackhole` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Recording and replay are handled in commands::dispatch via
    // BLACKHOLE_RECORD=<dir> and BLACKHOLE_REPLAY=<file>.
    match blackhole::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
