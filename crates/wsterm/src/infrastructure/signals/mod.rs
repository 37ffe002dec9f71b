//! OS termination signals.
//!
//! SIGINT and SIGTERM both become a single termination request; every other
//! signal keeps its default behaviour. Registration happens once at startup.
//! There is no teardown: the handlers live as long as the process.
//!
//! Note that in raw mode Ctrl+C is delivered to the peer as byte `0x03`
//! rather than raising SIGINT, which is why the startup banner suggests
//! `kill -15 <pid>`.

use anyhow::Context;
use async_trait::async_trait;

use crate::application::ports::TerminationSource;

/// Termination requests from the operating system.
pub struct OsTermination {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl OsTermination {
    /// Installs the signal handlers.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler cannot be registered.
    #[cfg(unix)]
    pub fn register() -> anyhow::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let interrupt =
            signal(SignalKind::interrupt()).context("failed to register SIGINT handler")?;
        let terminate =
            signal(SignalKind::terminate()).context("failed to register SIGTERM handler")?;
        Ok(Self {
            interrupt,
            terminate,
        })
    }

    /// Installs the Ctrl+C handler (the only portable termination signal).
    #[cfg(not(unix))]
    pub fn register() -> anyhow::Result<Self> {
        Ok(Self {})
    }
}

#[async_trait]
impl TerminationSource for OsTermination {
    #[cfg(unix)]
    async fn recv(&mut self) {
        // Signal::recv is cancel-safe, so losing the race drops nothing.
        tokio::select! {
            _ = self.interrupt.recv() => {}
            _ = self.terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
