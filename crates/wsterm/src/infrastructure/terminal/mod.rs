//! Terminal infrastructure: raw mode and the stdin reader.
//!
//! # Raw mode
//!
//! [`RawModeGuard`] switches the controlling terminal to raw mode through a
//! [`TerminalMode`] ([`CrosstermTerminal`] in production) and restores the
//! previous mode when dropped, so every exit path out of
//! [`run_bridge`](super::client::run_bridge) restores the terminal. If
//! raw mode cannot be enabled (stdin is a pipe, no controlling terminal) the
//! failure is reported and the bridge carries on in cooked mode.
//!
//! # Stdin reader
//!
//! Blocking reads from stdin cannot be cancelled, so they run on a dedicated
//! OS thread. Each `read()` result is handed to the async side through a
//! bounded channel of capacity 1 as an [`InputEvent`]; the main loop can then
//! wait on input, the Done signal, and termination requests at once. The
//! thread is detached: it ends on EOF/error, or with the process.

pub mod mock;

use std::io::{self, Read};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::ports::InputEvent;

/// Switches the controlling terminal in and out of raw mode.
pub trait TerminalMode {
    /// Puts the terminal in raw mode.
    fn enable_raw(&mut self) -> io::Result<()>;
    /// Returns the terminal to the mode it had before [`enable_raw`](Self::enable_raw).
    fn restore(&mut self) -> io::Result<()>;
}

/// The real terminal, driven through `crossterm`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermTerminal;

impl TerminalMode for CrosstermTerminal {
    fn enable_raw(&mut self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn restore(&mut self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }
}

/// Restores the terminal mode on drop.
///
/// Nothing is restored if raw mode could not be enabled in the first place.
pub struct RawModeGuard<M: TerminalMode> {
    mode: M,
    enabled: bool,
}

impl<M: TerminalMode> RawModeGuard<M> {
    /// Enables raw mode, or logs why it could not be enabled.
    pub fn enable(mut mode: M) -> Self {
        let enabled = match mode.enable_raw() {
            Ok(()) => {
                debug!("terminal switched to raw mode");
                true
            }
            Err(e) => {
                warn!("cannot set input terminal in raw mode: {e}");
                false
            }
        };
        Self { mode, enabled }
    }
}

impl<M: TerminalMode> Drop for RawModeGuard<M> {
    fn drop(&mut self) {
        if self.enabled {
            if let Err(e) = self.mode.restore() {
                warn!("failed to restore terminal mode: {e}");
            }
        }
    }
}

/// Spawns the stdin reader thread and returns the receiving end.
///
/// # Errors
///
/// Returns an error if the OS refuses to create the thread.
pub fn spawn_stdin_reader(chunk_size: usize) -> io::Result<mpsc::Receiver<InputEvent>> {
    let (tx, rx) = mpsc::channel(1);
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || read_chunks(io::stdin().lock(), chunk_size, &tx))?;
    Ok(rx)
}

/// Reads `reader` in chunks of at most `chunk_size` bytes until EOF or error.
///
/// A zero-byte read is end of input and is reported as
/// [`InputEvent::Closed`], never as an empty chunk.
fn read_chunks<R: Read>(mut reader: R, chunk_size: usize, tx: &mpsc::Sender<InputEvent>) {
    let mut buf = vec![0u8; chunk_size];
    loop {
        let event = match reader.read(&mut buf) {
            Ok(0) => InputEvent::Closed,
            Ok(n) => InputEvent::Chunk(buf[..n].to_vec()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => InputEvent::Failed(e),
        };
        let last = !matches!(event, InputEvent::Chunk(_));

        if tx.blocking_send(event).is_err() {
            debug!("input receiver dropped; stdin reader exiting");
            return;
        }
        if last {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{ModeChange, RecordingTerminal};
    use super::*;

    #[test]
    fn test_guard_restores_raw_mode_on_drop() {
        // Arrange
        let terminal = RecordingTerminal::new();

        // Act
        let guard = RawModeGuard::enable(terminal.clone());
        let while_held = terminal.changes();
        drop(guard);

        // Assert
        assert_eq!(while_held, vec![ModeChange::EnableRaw]);
        assert_eq!(
            terminal.changes(),
            vec![ModeChange::EnableRaw, ModeChange::Restore]
        );
    }

    #[test]
    fn test_guard_skips_restore_when_raw_mode_refused() {
        let terminal = RecordingTerminal::refusing_raw_mode();
        drop(RawModeGuard::enable(terminal.clone()));
        assert!(terminal.changes().is_empty());
    }

    /// A reader that fails with a fixed error after the given data.
    struct FailingReader {
        data: io::Cursor<Vec<u8>>,
        kind: io::ErrorKind,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(self.kind, "boom")),
                n => Ok(n),
            }
        }
    }

    fn collect(rx: &mut mpsc::Receiver<InputEvent>) -> Vec<InputEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.blocking_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_reader_splits_into_chunks_of_at_most_chunk_size() {
        // Arrange: 300 bytes with a 128-byte buffer.
        let data: Vec<u8> = (0..300u32).map(|i| i as u8).collect();
        let (tx, mut rx) = mpsc::channel(16);

        // Act
        let source = io::Cursor::new(data.clone());
        let handle = thread::spawn(move || read_chunks(source, 128, &tx));
        let events = collect(&mut rx);
        handle.join().unwrap();

        // Assert: chunks reassemble to the input, none larger than 128, then Closed.
        let mut joined = Vec::new();
        for event in &events[..events.len() - 1] {
            match event {
                InputEvent::Chunk(bytes) => {
                    assert!(bytes.len() <= 128 && !bytes.is_empty());
                    joined.extend_from_slice(bytes);
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(joined, data);
        assert!(matches!(events.last(), Some(InputEvent::Closed)));
    }

    #[test]
    fn test_empty_input_reports_closed_not_empty_chunk() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = thread::spawn(move || read_chunks(io::empty(), 128, &tx));
        let events = collect(&mut rx);
        handle.join().unwrap();

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], InputEvent::Closed));
    }

    #[test]
    fn test_read_error_is_reported_and_ends_reader() {
        let reader = FailingReader {
            data: io::Cursor::new(b"hi".to_vec()),
            kind: io::ErrorKind::BrokenPipe,
        };
        let (tx, mut rx) = mpsc::channel(4);
        let handle = thread::spawn(move || read_chunks(reader, 128, &tx));
        let events = collect(&mut rx);
        handle.join().unwrap();

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], InputEvent::Chunk(b) if b.as_slice() == b"hi"));
        assert!(matches!(&events[1], InputEvent::Failed(e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_reader_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        // io::repeat never ends; the reader must notice the closed channel.
        let handle = thread::spawn(move || read_chunks(io::repeat(b'a'), 8, &tx));
        handle.join().unwrap();
    }
}
