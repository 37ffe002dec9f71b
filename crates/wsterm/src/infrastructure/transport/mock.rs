//! In-memory transport halves for unit testing.
//!
//! Allow tests to script inbound frames and record outbound frames without a
//! socket or a WebSocket peer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};

use crate::application::ports::{FrameSink, FrameSource, TransportError};
use crate::domain::Frame;

type Scripted = Result<Vec<u8>, TransportError>;

enum Script {
    Fixed(VecDeque<Scripted>),
    Channel(mpsc::Receiver<Scripted>),
}

/// A [`FrameSource`] that yields pre-scripted results.
///
/// When the script runs out (or the feeding channel closes) it reports
/// [`TransportError::Ended`].
pub struct ScriptedSource {
    script: Script,
}

impl ScriptedSource {
    /// Yields `items` in order, then `Ended`.
    pub fn new(items: Vec<Scripted>) -> Self {
        Self {
            script: Script::Fixed(items.into()),
        }
    }

    /// Yields whatever is sent on the returned sender; `Ended` once it is dropped.
    pub fn channel() -> (Self, mpsc::Sender<Scripted>) {
        let (tx, rx) = mpsc::channel(16);
        (
            Self {
                script: Script::Channel(rx),
            },
            tx,
        )
    }
}

#[async_trait]
impl FrameSource for ScriptedSource {
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        let next = match &mut self.script {
            Script::Fixed(items) => items.pop_front(),
            Script::Channel(rx) => rx.recv().await,
        };
        next.unwrap_or(Err(TransportError::Ended))
    }
}

#[derive(Default)]
struct SinkState {
    frames: Vec<Frame>,
    /// Number of sends that succeed before every later send fails.
    fail_after: Option<usize>,
    attempts: usize,
    closed: bool,
}

/// A [`FrameSink`] that records every frame it accepts.
///
/// Clones share the same record, so a test can keep one clone while the
/// session owns another.
#[derive(Clone, Default)]
pub struct RecordingSink {
    state: Arc<Mutex<SinkState>>,
    sent: Arc<Notify>,
}

impl RecordingSink {
    /// Creates a sink that accepts every frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send after the first `n` fail.
    pub fn fail_after(&self, n: usize) {
        self.state.lock().expect("lock poisoned").fail_after = Some(n);
    }

    /// Snapshot of the frames accepted so far.
    pub fn frames(&self) -> Vec<Frame> {
        self.state.lock().expect("lock poisoned").frames.clone()
    }

    /// `true` once [`FrameSink::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().expect("lock poisoned").closed
    }

    /// Waits until at least `n` frames have been accepted.
    pub async fn wait_for_frames(&self, n: usize) {
        loop {
            let notified = self.sent.notified();
            if self.state.lock().expect("lock poisoned").frames.len() >= n {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl FrameSink for RecordingSink {
    async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.attempts += 1;
            if let Some(limit) = state.fail_after {
                if state.attempts > limit {
                    return Err(TransportError::Failed("injected send failure".into()));
                }
            }
            state.frames.push(frame);
        }
        self.sent.notify_waiters();
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.state.lock().expect("lock poisoned").closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_source_ends_after_script() {
        let mut source = ScriptedSource::new(vec![Ok(b"a".to_vec())]);
        assert_eq!(source.recv().await.unwrap(), b"a");
        assert!(matches!(source.recv().await, Err(TransportError::Ended)));
    }

    #[tokio::test]
    async fn test_recording_sink_clones_share_frames() {
        let sink = RecordingSink::new();
        let mut owned = sink.clone();
        owned.send(Frame::Binary(b"x".to_vec())).await.unwrap();
        assert_eq!(sink.frames(), vec![Frame::Binary(b"x".to_vec())]);
    }

    #[tokio::test]
    async fn test_recording_sink_fail_after() {
        let mut sink = RecordingSink::new();
        sink.fail_after(1);
        assert!(sink.send(Frame::Binary(vec![1])).await.is_ok());
        assert!(sink.send(Frame::Binary(vec![2])).await.is_err());
        assert_eq!(sink.frames().len(), 1);
    }

    #[tokio::test]
    async fn test_recording_sink_records_close() {
        let sink = RecordingSink::new();
        let mut owned = sink.clone();
        assert!(!sink.is_closed());

        owned.close().await.unwrap();

        assert!(sink.is_closed());
    }
}
