//! In-memory terminal for unit testing.
//!
//! Records every mode change instead of touching the real terminal, so tests
//! can check that raw mode is restored on each exit path.

use std::io;
use std::sync::{Arc, Mutex};

use super::TerminalMode;

/// A mode change applied to a [`RecordingTerminal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    EnableRaw,
    Restore,
}

/// A [`TerminalMode`] that records successful mode changes.
///
/// Clones share the same record.
#[derive(Clone, Default)]
pub struct RecordingTerminal {
    changes: Arc<Mutex<Vec<ModeChange>>>,
    refuse_raw: bool,
}

impl RecordingTerminal {
    /// A terminal that accepts raw mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// A terminal that refuses raw mode, like a pipe on stdin.
    pub fn refusing_raw_mode() -> Self {
        Self {
            refuse_raw: true,
            ..Self::default()
        }
    }

    /// Snapshot of the changes applied so far.
    pub fn changes(&self) -> Vec<ModeChange> {
        self.changes.lock().expect("lock poisoned").clone()
    }
}

impl TerminalMode for RecordingTerminal {
    fn enable_raw(&mut self) -> io::Result<()> {
        if self.refuse_raw {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "not a terminal"));
        }
        self.changes
            .lock()
            .expect("lock poisoned")
            .push(ModeChange::EnableRaw);
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        self.changes
            .lock()
            .expect("lock poisoned")
            .push(ModeChange::Restore);
        Ok(())
    }
}
