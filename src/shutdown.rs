//! Cancellation on SIGINT / SIGTERM.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Create a `CancellationToken` that is cancelled on SIGINT or SIGTERM.
///
/// Handlers are installed before this returns, so a signal arriving while
/// rules are being applied is held until the task starts waiting instead
/// of killing the process with rules installed. Must be called inside a
/// tokio runtime.
#[must_use]
pub fn create_shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut interrupt), Ok(mut terminate)) => {
                tokio::spawn(async move {
                    tokio::select! {
                        _ = interrupt.recv() => info!("received SIGINT"),
                        _ = terminate.recv() => info!("received SIGTERM"),
                    }
                    token_clone.cancel();
                });
            }
            (Err(e), _) | (_, Err(e)) => warn!(error = %e, "failed to install signal handlers"),
        }
    }

    #[cfg(not(unix))]
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => token_clone.cancel(),
            Err(e) => warn!(error = %e, "failed to install Ctrl+C handler"),
        }
    });

    token
}
