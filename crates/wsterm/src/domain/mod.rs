//! Domain layer for wsterm.
//!
//! The domain layer contains pure types that have no dependencies on I/O,
//! networking, or external frameworks.
//!
//! # What belongs in the domain layer?
//!
//! - Configuration structures
//! - The frame vocabulary exchanged with the peer
//! - The session state machine and its transition table
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `TcpStream`, or `WebSocket` types
//! - Terminal mode switching or signal registration

pub mod config;
pub mod frame;
pub mod state;

pub use config::ClientConfig;
pub use frame::{CloseStatus, Frame, NORMAL_CLOSURE};
pub use state::{SessionEvent, SessionState};
