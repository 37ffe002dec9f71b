//! Application layer for wsterm.
//!
//! The application layer knows *what* the bridge does: relay peer frames to
//! the terminal, relay terminal chunks to the peer, and shut down cleanly. It
//! delegates *how* to the infrastructure layer through the traits in
//! [`ports`].
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or performing the WebSocket handshake
//! - Switching the terminal to raw mode
//! - Registering OS signal handlers

pub mod done;
pub mod inbound;
pub mod ports;
pub mod session;

pub use done::{done_signal, DoneSignal, DoneWatcher};
pub use inbound::{run_inbound_relay, InboundReport};
pub use ports::{FrameSink, FrameSource, InputEvent, InputSource, TerminationSource, TransportError};
pub use session::{Session, SessionOutcome};
