//! Main control loop: outbound relay plus shutdown coordination.
//!
//! The loop is an explicit state machine (see [`SessionState`]):
//!
//! - **Running**: wait on three sources with fixed priority:
//!   1. the Done signal (inbound relay exited) → `Done`
//!   2. a termination request → `Closing`
//!   3. terminal input → send one binary frame per chunk
//! - **Closing**: send one close frame (1000, empty reason), then wait for
//!   the Done signal for at most `close_timeout` → `Done`
//! - **Done**: return the outcome.
//!
//! Terminal input arrives through a cancel-safe [`InputSource`], so a pending
//! read never delays the reaction to Done or to a termination request.

use std::io;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::done::DoneWatcher;
use super::ports::{FrameSink, InputEvent, InputSource, TerminationSource, TransportError};
use crate::domain::{CloseStatus, Frame, SessionEvent, SessionState};

/// How the session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The inbound relay finished first (peer closed or connection failed).
    InboundFinished,
    /// A termination request drove the graceful close.
    ///
    /// `acknowledged` is `true` when the inbound relay finished within the
    /// close timeout, `false` when the timeout elapsed first.
    Interrupted { acknowledged: bool },
    /// Reading terminal input failed.
    InputFailed(io::Error),
    /// Sending a binary frame failed.
    SendFailed(TransportError),
    /// Sending the close frame failed.
    CloseFailed(TransportError),
}

impl SessionOutcome {
    /// `true` for the outbound failure paths.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SessionOutcome::InputFailed(_)
                | SessionOutcome::SendFailed(_)
                | SessionOutcome::CloseFailed(_)
        )
    }
}

/// Result of one selection in the Running state.
enum Ready {
    InboundFinished,
    Termination,
    Input(InputEvent),
}

/// The main control loop and the resources it exclusively owns.
pub struct Session<K, I, T> {
    sink: K,
    input: I,
    termination: T,
    done: DoneWatcher,
    close_timeout: Duration,
    state: SessionState,
    input_open: bool,
    frames_sent: u64,
}

impl<K, I, T> Session<K, I, T>
where
    K: FrameSink,
    I: InputSource,
    T: TerminationSource,
{
    /// Creates a session in the `Running` state.
    pub fn new(sink: K, input: I, termination: T, done: DoneWatcher, close_timeout: Duration) -> Self {
        Self {
            sink,
            input,
            termination,
            done,
            close_timeout,
            state: SessionState::Running,
            input_open: true,
            frames_sent: 0,
        }
    }

    /// Current state (for diagnostics and tests).
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drives the state machine to `Done` and returns how it got there.
    ///
    /// The sink is returned alongside the outcome so the caller decides when
    /// the connection is finally dropped.
    pub async fn run(mut self) -> (SessionOutcome, K) {
        let mut outcome = None;

        while !self.state.is_done() {
            let (event, result) = match self.state {
                SessionState::Running => self.step_running().await,
                SessionState::Closing => self.close_gracefully().await,
                SessionState::Done => break,
            };
            if result.is_some() {
                outcome = result;
            }
            self.state = self.state.on(event);
        }

        debug!("session finished after sending {} frame(s)", self.frames_sent);
        // Done is only reachable through an event that records an outcome.
        (outcome.unwrap_or(SessionOutcome::InboundFinished), self.sink)
    }

    /// One iteration of the Running state.
    async fn step_running(&mut self) -> (SessionEvent, Option<SessionOutcome>) {
        let input_open = self.input_open;

        let ready = tokio::select! {
            biased;

            _ = self.done.wait() => Ready::InboundFinished,
            _ = self.termination.recv() => Ready::Termination,
            event = self.input.next_event(), if input_open => Ready::Input(event),
        };

        match ready {
            Ready::InboundFinished => {
                debug!("inbound relay finished; leaving main loop");
                (SessionEvent::InboundFinished, Some(SessionOutcome::InboundFinished))
            }
            Ready::Termination => {
                info!("interrupt");
                (SessionEvent::TerminationRequested, None)
            }
            Ready::Input(InputEvent::Chunk(bytes)) => self.forward(bytes).await,
            Ready::Input(InputEvent::Closed) => {
                info!("terminal input closed; waiting for the peer or an interrupt");
                self.input_open = false;
                (SessionEvent::InputClosed, None)
            }
            Ready::Input(InputEvent::Failed(e)) => {
                error!("read: {e}");
                (SessionEvent::InputFailed, Some(SessionOutcome::InputFailed(e)))
            }
        }
    }

    /// Sends one terminal chunk as a single binary frame.
    async fn forward(&mut self, bytes: Vec<u8>) -> (SessionEvent, Option<SessionOutcome>) {
        let len = bytes.len();
        let frame = Frame::Binary(bytes);
        let kind = frame.kind();
        match self.sink.send(frame).await {
            Ok(()) => {
                self.frames_sent += 1;
                debug!("sent {kind} frame ({len} bytes)");
                (SessionEvent::InputForwarded, None)
            }
            Err(e) => {
                error!("write: {e}");
                (SessionEvent::SendFailed, Some(SessionOutcome::SendFailed(e)))
            }
        }
    }

    /// The Closing state: close frame, then a bounded wait for the peer.
    async fn close_gracefully(&mut self) -> (SessionEvent, Option<SessionOutcome>) {
        let frame = Frame::Close(CloseStatus::normal());
        debug!("sending {} frame", frame.kind());
        if let Err(e) = self.sink.send(frame).await {
            error!("write close: {e}");
            return (SessionEvent::CloseFailed, Some(SessionOutcome::CloseFailed(e)));
        }

        let acknowledged = timeout(self.close_timeout, self.done.wait()).await.is_ok();
        if acknowledged {
            debug!("peer acknowledged close");
        } else {
            warn!(
                "peer did not acknowledge close within {:?}; giving up",
                self.close_timeout
            );
        }

        (
            SessionEvent::CloseSettled,
            Some(SessionOutcome::Interrupted { acknowledged }),
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
