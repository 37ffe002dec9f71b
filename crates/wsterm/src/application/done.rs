//! One-shot Done signal.
//!
//! The inbound relay owns the only [`DoneSignal`]; fulfilling it consumes the
//! value, so it cannot be set twice. Any number of [`DoneWatcher`]s observe
//! it. Built on `tokio::sync::watch`, which keeps the latest value so a
//! watcher that starts waiting after the fact returns immediately.

use tokio::sync::watch;

/// Setter half. Held by the inbound relay only.
#[derive(Debug)]
pub struct DoneSignal {
    tx: watch::Sender<bool>,
}

/// Observer half.
#[derive(Debug, Clone)]
pub struct DoneWatcher {
    rx: watch::Receiver<bool>,
}

/// Creates a fresh, unfulfilled Done signal.
pub fn done_signal() -> (DoneSignal, DoneWatcher) {
    let (tx, rx) = watch::channel(false);
    (DoneSignal { tx }, DoneWatcher { rx })
}

impl DoneSignal {
    /// Marks the relay as finished.
    pub fn fulfil(self) {
        // send_replace stores the value even when no watcher is alive.
        self.tx.send_replace(true);
    }
}

impl DoneWatcher {
    /// Waits until the signal is fulfilled.
    ///
    /// A setter dropped without fulfilling (e.g. the relay task panicked)
    /// also counts as done, so the coordinator can never wait forever on a
    /// relay that no longer exists. Cancel-safe.
    pub async fn wait(&mut self) {
        let _ = self.rx.wait_for(|done| *done).await;
    }

    /// Non-blocking check.
    pub fn is_done(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }
}
