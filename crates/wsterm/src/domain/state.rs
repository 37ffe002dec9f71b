//! Session state machine.
//!
//! The main loop is always in exactly one of three states:
//!
//! ```text
//!            TerminationRequested             CloseSettled / CloseFailed
//!  Running ──────────────────────▶ Closing ──────────────────────────────▶ Done
//!     │                                                                     ▲
//!     └──── InboundFinished / InputFailed / SendFailed ─────────────────────┘
//! ```
//!
//! Transitions are a pure function of the current state and one event, so
//! the table can be tested without any I/O.

/// State of the main control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Relaying terminal input and watching for shutdown triggers.
    Running,
    /// Close frame being sent; waiting (bounded) for the peer to acknowledge.
    Closing,
    /// Terminal state; the loop exits.
    Done,
}

/// Something the main loop observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The inbound relay exited and fulfilled the Done signal.
    InboundFinished,
    /// SIGINT or SIGTERM arrived.
    TerminationRequested,
    /// A terminal chunk was sent as a binary frame.
    InputForwarded,
    /// Terminal input reached end-of-file.
    InputClosed,
    /// Reading terminal input failed.
    InputFailed,
    /// Sending a binary frame failed.
    SendFailed,
    /// Sending the close frame failed.
    CloseFailed,
    /// The close wait finished, either acknowledged or timed out.
    CloseSettled,
}

impl SessionState {
    /// Returns the state that follows `event`.
    ///
    /// Events that have no meaning in the current state leave it unchanged.
    pub fn on(self, event: SessionEvent) -> SessionState {
        use SessionEvent::*;
        use SessionState::*;

        match (self, event) {
            (Running, InboundFinished | InputFailed | SendFailed) => Done,
            (Running, TerminationRequested) => Closing,
            (Running, InputForwarded | InputClosed) => Running,
            (Closing, CloseFailed | CloseSettled) => Done,
            (Done, _) => Done,
            (state, _) => state,
        }
    }

    /// `true` once the loop should stop.
    pub fn is_done(self) -> bool {
        self == SessionState::Done
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
