//! Traits the application layer uses to reach the outside world.
//!
//! Each trait has one production implementation in the infrastructure layer
//! and a lightweight fake for tests. The channel-backed implementations at
//! the bottom of this file double as both: the stdin reader thread and the
//! signal listener feed the same channel types the tests use.

use std::io;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::Frame;

/// Boxed error from the underlying transport library.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by a [`FrameSink`] or [`FrameSource`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer sent a close control frame.
    #[error("peer closed the connection (code {code}{})", fmt_reason(.reason))]
    PeerClosed { code: u16, reason: String },

    /// The connection ended without a close frame, or was already closed.
    #[error("connection closed")]
    Ended,

    /// Any other transport failure (I/O, protocol violation, ...).
    #[error("{0}")]
    Failed(#[source] BoxError),
}

fn fmt_reason(reason: &str) -> String {
    if reason.is_empty() {
        String::new()
    } else {
        format!(": {reason}")
    }
}

impl TransportError {
    /// `true` when the connection ended in an orderly way.
    pub fn is_orderly(&self) -> bool {
        matches!(self, TransportError::PeerClosed { .. } | TransportError::Ended)
    }
}

/// Write half of the connection.
#[async_trait]
pub trait FrameSink: Send {
    /// Sends one frame and flushes it to the transport.
    async fn send(&mut self, frame: Frame) -> Result<(), TransportError>;

    /// Flushes queued control frames and shuts the write half down.
    ///
    /// After a peer-initiated close this is what delivers the close reply.
    /// Closing an already closed connection is not an error.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Read half of the connection.
#[async_trait]
pub trait FrameSource: Send {
    /// Waits for the next data frame and returns its payload.
    ///
    /// Any error is final: callers must not call `recv` again afterwards.
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError>;
}

/// One observation from terminal input.
#[derive(Debug)]
pub enum InputEvent {
    /// Bytes read in a single read call.
    Chunk(Vec<u8>),
    /// End of input.
    Closed,
    /// The read call failed.
    Failed(io::Error),
}

/// Source of terminal input.
#[async_trait]
pub trait InputSource: Send {
    /// Waits for the next input event. Must be cancel-safe.
    async fn next_event(&mut self) -> InputEvent;
}

/// Source of termination requests (SIGINT / SIGTERM in production).
#[async_trait]
pub trait TerminationSource: Send {
    /// Resolves when termination is requested. Must be cancel-safe.
    async fn recv(&mut self);
}

#[async_trait]
impl InputSource for mpsc::Receiver<InputEvent> {
    async fn next_event(&mut self) -> InputEvent {
        // All senders gone means the reader is finished.
        self.recv().await.unwrap_or(InputEvent::Closed)
    }
}

#[async_trait]
impl TerminationSource for mpsc::Receiver<()> {
    async fn recv(&mut self) {
        if mpsc::Receiver::recv(self).await.is_none() {
            // No sender left: termination can never be requested.
            std::future::pending::<()>().await;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
