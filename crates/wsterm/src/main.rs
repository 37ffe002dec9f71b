//! wsterm: terminal ↔ WebSocket bridge, entry point.
//!
//! Connects to `ws://<address>/` offering the `binary` sub-protocol, puts the
//! terminal in raw mode, and then:
//!
//! - forwards every chunk typed at the terminal as one binary frame;
//! - writes every data frame from the peer to stdout, unchanged;
//! - on SIGINT / SIGTERM sends a close frame (1000) and waits up to one second
//!   for the peer to acknowledge before exiting.
//!
//! # Usage
//!
//! ```text
//! wsterm [OPTIONS]
//!
//! Options:
//!   --address <HOST:PORT>   Remote endpoint [default: localhost:8080]
//! ```
//!
//! The address can also be set with `WSTERM_ADDRESS`; the flag wins when both
//! are present. Logs go to stderr and are filtered with `RUST_LOG`
//! (default `info`), so stdout carries nothing but peer data.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio_tungstenite::tungstenite::http::uri::Authority;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wsterm::domain::ClientConfig;
use wsterm::infrastructure::{exit_status, run_client};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Terminal ↔ WebSocket bridge.
///
/// Forwards raw keystrokes to a WebSocket endpoint as binary frames and
/// prints whatever the endpoint sends back.
#[derive(Debug, Parser)]
#[command(
    name = "wsterm",
    about = "Bridge a raw-mode terminal to a binary WebSocket endpoint",
    version
)]
struct Cli {
    /// `host:port` of the WebSocket endpoint.
    #[arg(
        long,
        visible_alias = "addr",
        default_value = wsterm::domain::config::DEFAULT_ADDRESS,
        env = "WSTERM_ADDRESS"
    )]
    address: String,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--address` is not a valid `host[:port]` URI
    /// authority (empty, contains a path, a scheme, or invalid characters).
    fn into_client_config(self) -> anyhow::Result<ClientConfig> {
        let address = self.address.trim();

        let authority: Authority = address
            .parse()
            .with_context(|| format!("invalid address '{address}': expected host:port"))?;
        anyhow::ensure!(
            !authority.host().is_empty(),
            "invalid address '{address}': missing host"
        );

        Ok(ClientConfig::with_address(authority.as_str()))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // stderr only: stdout belongs to the peer's data.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_client_config()?;

    let outcome = match run_client(config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{e:#}");
            return Ok(ExitCode::FAILURE);
        }
    };

    info!("wsterm stopped ({outcome:?})");
    Ok(ExitCode::from(exit_status(&outcome)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
