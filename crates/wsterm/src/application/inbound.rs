//! Inbound relay: peer frames → terminal output.
//!
//! Runs in its own task. Every payload is written and flushed as soon as it
//! arrives, in receipt order; nothing else writes to the output. The first
//! receive failure ends the relay, and the Done signal is fulfilled only after
//! the loop has fully exited, so no frame is ever received after Done fires.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::done::DoneSignal;
use super::ports::{FrameSource, TransportError};

/// Why the inbound relay stopped.
#[derive(Debug)]
pub enum InboundEnd {
    /// The connection yielded a close frame, an error, or end-of-stream.
    Receive(TransportError),
    /// Writing a payload to the terminal failed.
    Output(std::io::Error),
}

/// Summary of one inbound relay run.
#[derive(Debug)]
pub struct InboundReport {
    /// Number of frames written to the output.
    pub frames: u64,
    /// Total payload bytes written to the output.
    pub bytes: u64,
    /// What ended the relay.
    pub ended_by: InboundEnd,
}

/// Relays frames from `source` to `output` until the source fails.
///
/// `done` is fulfilled exactly once, just before returning.
pub async fn run_inbound_relay<S, W>(mut source: S, mut output: W, done: DoneSignal) -> InboundReport
where
    S: FrameSource,
    W: AsyncWrite + Unpin + Send,
{
    let mut frames = 0u64;
    let mut bytes = 0u64;

    let ended_by = loop {
        let payload = match source.recv().await {
            Ok(payload) => payload,
            Err(e) => {
                if e.is_orderly() {
                    info!("read: {e}");
                } else {
                    warn!("read: {e}");
                }
                break InboundEnd::Receive(e);
            }
        };

        if let Err(e) = write_payload(&mut output, &payload).await {
            warn!("write output: {e}");
            break InboundEnd::Output(e);
        }

        frames += 1;
        bytes += payload.len() as u64;
    };

    debug!("inbound relay finished after {frames} frame(s), {bytes} byte(s)");
    done.fulfil();

    InboundReport {
        frames,
        bytes,
        ended_by,
    }
}

async fn write_payload<W>(output: &mut W, payload: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(payload).await?;
    output.flush().await
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::done::done_signal;
    use crate::infrastructure::transport::mock::ScriptedSource;

    #[tokio::test]
    async fn test_each_frame_is_one_write_in_receipt_order() {
        // Arrange: three frames, then the peer closes.
        let source = ScriptedSource::new(vec![
            Ok(b"first".to_vec()),
            Ok(b"second".to_vec()),
            Ok(b"third".to_vec()),
        ]);
        // The mock panics on drop unless exactly these writes happened, in order.
        let output = tokio_test::io::Builder::new()
            .write(b"first")
            .write(b"second")
            .write(b"third")
            .build();
        let (done, watcher) = done_signal();

        // Act
        let report = run_inbound_relay(source, output, done).await;

        // Assert
        assert_eq!(report.frames, 3);
        assert_eq!(report.bytes, 16);
        assert!(watcher.is_done());
        assert!(matches!(
            report.ended_by,
            InboundEnd::Receive(TransportError::Ended)
        ));
    }

    #[tokio::test]
    async fn test_done_not_fulfilled_before_source_fails() {
        // Arrange: a source that yields nothing until the feed is dropped.
        let (source, feed) = ScriptedSource::channel();
        let (done, mut watcher) = done_signal();
        let relay = tokio::spawn(run_inbound_relay(source, Vec::new(), done));

        // Act: give the relay a moment to run.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        // Assert: still running, Done untouched.
        assert!(!watcher.is_done());

        // Ending the stream releases the relay.
        drop(feed);
        watcher.wait().await;
        let report = relay.await.unwrap();
        assert_eq!(report.frames, 0);
    }

    #[tokio::test]
    async fn test_done_fulfilled_after_last_write() {
        // Arrange
        let (source, feed) = ScriptedSource::channel();
        let (done, mut watcher) = done_signal();

        let relay = tokio::spawn(async move {
            let mut output = Vec::new();
            let report = run_inbound_relay(source, &mut output, done).await;
            (report, output)
        });

        // Act
        feed.send(Ok(b"hello ".to_vec())).await.unwrap();
        feed.send(Ok(b"world".to_vec())).await.unwrap();
        feed.send(Err(TransportError::PeerClosed {
            code: 1000,
            reason: String::new(),
        }))
        .await
        .unwrap();
        watcher.wait().await;

        // Assert: by the time Done is observable, every payload is written.
        let (report, output) = relay.await.unwrap();
        assert_eq!(output, b"hello world");
        assert_eq!(report.frames, 2);
    }

    #[tokio::test]
    async fn test_immediate_failure_writes_nothing() {
        let source = ScriptedSource::new(vec![Err(TransportError::Failed(
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset").into(),
        ))]);
        let mut output = Vec::new();
        let (done, watcher) = done_signal();

        let report = run_inbound_relay(source, &mut output, done).await;

        assert_eq!(report.frames, 0);
        assert!(output.is_empty());
        assert!(watcher.is_done());
        assert!(matches!(
            report.ended_by,
            InboundEnd::Receive(TransportError::Failed(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_payload_is_passed_through() {
        let source = ScriptedSource::new(vec![Ok(Vec::new()), Ok(b"x".to_vec())]);
        let mut output = Vec::new();
        let (done, _watcher) = done_signal();

        let report = run_inbound_relay(source, &mut output, done).await;

        assert_eq!(report.frames, 2);
        assert_eq!(output, b"x");
    }

    #[tokio::test]
    async fn test_output_failure_ends_relay_and_fulfils_done() {
        // Arrange: the terminal refuses the first write.
        let source = ScriptedSource::new(vec![Ok(b"abc".to_vec()), Ok(b"def".to_vec())]);
        let output = tokio_test::io::Builder::new()
            .write_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            .build();
        let (done, watcher) = done_signal();

        // Act
        let report = run_inbound_relay(source, output, done).await;

        // Assert
        assert_eq!(report.frames, 0);
        assert!(watcher.is_done());
        assert!(matches!(report.ended_by, InboundEnd::Output(_)));
    }
}
