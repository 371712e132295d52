//! Shutdown signal handling shared by both transports.

use std::io;

/// Resolves once the process is asked to stop.
///
/// On Unix this is SIGINT or SIGTERM; on Windows, Ctrl+C. Returns the name of
/// the signal that fired.
///
/// # Errors
///
/// Returns an error if the signal handlers cannot be installed.
#[cfg(unix)]
pub async fn shutdown_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => Ok("SIGINT"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

/// Resolves once the process is asked to stop.
///
/// On Unix this is SIGINT or SIGTERM; on Windows, Ctrl+C. Returns the name of
/// the signal that fired.
///
/// # Errors
///
/// Returns an error if the signal handler cannot be installed.
#[cfg(windows)]
pub async fn shutdown_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}
