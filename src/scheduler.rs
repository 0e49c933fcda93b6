//! Fixed-interval scheduling loop.
//!
//! Drives cycles until an interrupt signal requests shutdown. Each cycle
//! runs in its own task so that a panic surfaces here as a fatal fault
//! instead of unwinding through the loop in an unknown state. The interval
//! is measured from the end of one cycle to the start of the sleep, so
//! cumulative drift across cycles is expected.

use std::time::Duration;

use thiserror::Error;

use crate::config::AgentConfig;
use crate::cycle::CycleRunner;

/// Unrecoverable faults that terminate the agent.
#[derive(Debug, Error)]
pub enum FatalError {
    /// An HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// A cycle violated its no-panic contract.
    #[error("cycle aborted: {0}")]
    CycleAborted(String),
}

/// Run the scheduling loop until interrupted.
///
/// # Errors
/// Returns [`FatalError`] if the runner cannot be built or a cycle panics.
/// A clean interrupt returns `Ok(())`.
pub async fn run(config: AgentConfig) -> Result<(), FatalError> {
    let runner = CycleRunner::new(&config)?;
    run_with(runner, config.interval).await
}

/// Loop body, decoupled from component construction.
pub async fn run_with(runner: CycleRunner, interval: Duration) -> Result<(), FatalError> {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    tracing::info!(interval_secs = interval.as_secs(), "Scheduler started");

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            result = guarded_cycle(&runner) => result?,
        }

        tracing::info!(sleep_secs = interval.as_secs(), "Waiting for next cycle");
        tokio::select! {
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    tracing::info!("Scheduler stopped on interrupt");
    Ok(())
}

/// Run one cycle inside its own task, converting a panic into a fatal error.
async fn guarded_cycle(runner: &CycleRunner) -> Result<(), FatalError> {
    let runner = runner.clone();
    match tokio::spawn(async move { runner.run_cycle().await }).await {
        Ok(_outcome) => Ok(()),
        Err(e) if e.is_panic() => Err(FatalError::CycleAborted(format!("cycle panicked: {e}"))),
        Err(e) => Err(FatalError::CycleAborted(e.to_string())),
    }
}

/// Resolve when the process receives a shutdown request.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }
}
