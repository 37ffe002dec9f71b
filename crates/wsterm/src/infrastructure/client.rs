//! Wires the bridge together for the binary.
//!
//! Startup order:
//!
//! 1. Register SIGINT / SIGTERM, so a signal during the handshake is not lost.
//! 2. Dial the WebSocket (`dial:` on failure; nothing else is set up yet).
//! 3. Switch the terminal to raw mode (guard restores it on every return).
//! 4. Start the terminal input reader.
//! 5. Spawn the inbound relay task: peer frames → output.
//! 6. Run the session loop on the current task until it reaches `Done`.
//! 7. Close the write half (flushing any close reply), stop the relay, and
//!    restore the terminal; the process exits next.
//!
//! Steps 3 to 7 live in [`run_bridge`], which takes every resource as a
//! parameter so the exit paths can be exercised without a real terminal.

use std::io;

use anyhow::Context;
use tokio::io::AsyncWrite;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::application::{
    done_signal, run_inbound_relay, FrameSink, FrameSource, InputSource, Session, SessionOutcome,
    TerminationSource,
};
use crate::domain::ClientConfig;
use crate::infrastructure::signals::OsTermination;
use crate::infrastructure::terminal::{spawn_stdin_reader, CrosstermTerminal, RawModeGuard, TerminalMode};
use crate::infrastructure::transport::dial;

/// Runs one bridge session against `config.address`.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed, the WebSocket
/// handshake fails, or the stdin reader thread cannot be started. Failures
/// after the session starts are reported in the returned [`SessionOutcome`].
pub async fn run_client(config: ClientConfig) -> anyhow::Result<SessionOutcome> {
    let termination = OsTermination::register()?;

    info!(
        "connecting to {}. `kill -15 {}` to stop",
        config.endpoint_url(),
        std::process::id()
    );

    let connection = dial(&config).await.context("dial")?;

    run_bridge(
        &config,
        connection,
        CrosstermTerminal,
        tokio::io::stdout(),
        spawn_stdin_reader,
        termination,
    )
    .await
}

/// Runs the bridge over an established connection.
///
/// `start_input` is called with `config.read_chunk_size` once raw mode is
/// in place. The terminal is restored before this returns, whatever the
/// outcome.
///
/// # Errors
///
/// Returns an error only if `start_input` fails.
pub async fn run_bridge<K, S, M, W, I, T>(
    config: &ClientConfig,
    (sink, source): (K, S),
    terminal: M,
    output: W,
    start_input: impl FnOnce(usize) -> io::Result<I>,
    termination: T,
) -> anyhow::Result<SessionOutcome>
where
    K: FrameSink,
    S: FrameSource + 'static,
    M: TerminalMode,
    W: AsyncWrite + Unpin + Send + 'static,
    I: InputSource,
    T: TerminationSource,
{
    let raw_mode = RawModeGuard::enable(terminal);

    let input = start_input(config.read_chunk_size)
        .context("failed to start the terminal input reader")?;

    let (done, watcher) = done_signal();
    let inbound = tokio::spawn(run_inbound_relay(source, output, done));

    let session = Session::new(sink, input, termination, watcher, config.close_timeout);
    let (outcome, mut sink) = session.run().await;

    // The write half is released once, after the main loop is finished.
    match timeout(config.close_timeout, sink.close()).await {
        Ok(Ok(())) => debug!("connection write half closed"),
        Ok(Err(e)) => debug!("close connection: {e}"),
        Err(_) => warn!("connection close did not complete within {:?}", config.close_timeout),
    }
    drop(sink);

    if inbound.is_finished() {
        match inbound.await {
            Ok(report) => debug!(
                "inbound relay wrote {} frame(s), {} byte(s)",
                report.frames, report.bytes
            ),
            Err(e) => warn!("inbound relay task failed: {e}"),
        }
    } else {
        inbound.abort();
    }

    drop(raw_mode);
    Ok(outcome)
}

/// Maps a session outcome to the process exit status (0 or 1).
pub fn exit_status(outcome: &SessionOutcome) -> u8 {
    u8::from(outcome.is_failure())
}
