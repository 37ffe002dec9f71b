//! Infrastructure layer for wsterm.
//!
//! The infrastructure layer handles all I/O: the WebSocket connection, the
//! terminal, and OS signals.
//!
//! # Responsibilities
//!
//! - Performing the WebSocket upgrade handshake with the `binary` sub-protocol
//! - Adapting the split WebSocket stream to [`FrameSink`] / [`FrameSource`]
//! - Switching the terminal to raw mode and restoring it on every exit path
//! - Reading stdin on a dedicated thread
//! - Turning SIGINT / SIGTERM into termination requests
//!
//! [`FrameSink`]: crate::application::FrameSink
//! [`FrameSource`]: crate::application::FrameSource

pub mod client;
pub mod signals;
pub mod terminal;
pub mod transport;

pub use client::{exit_status, run_bridge, run_client};
