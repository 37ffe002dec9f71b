//! wsterm library crate.
//!
//! This crate bridges a raw-mode terminal and a single WebSocket connection:
//! every chunk typed at the terminal is sent as a binary frame, and every data
//! frame the peer sends is written verbatim to standard output.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Terminal (raw stdin / stdout)
//!         ↕
//! [wsterm]
//!   ├── domain/           Pure types: ClientConfig, Frame, SessionState
//!   ├── application/      Inbound relay, session loop, Done signal, ports
//!   └── infrastructure/
//!         ├── transport/  WebSocket dial + frame adapters (tokio-tungstenite)
//!         ├── terminal/   Raw-mode guard and stdin reader thread (crossterm)
//!         ├── signals/    SIGINT / SIGTERM source (tokio::signal)
//!         └── client/     Wires everything together for `main.rs`
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain` only, and talks to the outside world
//!   through the traits in [`application::ports`].
//! - `infrastructure` implements those traits on top of `tokio`,
//!   `tokio-tungstenite`, and `crossterm`.
//!
//! The split keeps the shutdown coordination testable without a real
//! terminal, a real socket, or real OS signals.

/// Domain layer: pure types (no I/O).
pub mod domain;

/// Application layer: relays and the shutdown coordinator.
pub mod application;

/// Infrastructure layer: WebSocket, terminal, and signal adapters.
pub mod infrastructure;
