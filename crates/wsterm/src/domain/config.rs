//! Client configuration types.
//!
//! [`ClientConfig`] is the single source of truth for all runtime settings.
//! Only the address is user-facing; the remaining fields are fixed by the
//! wire contract and kept here so tests and embedders can see them in one
//! place.

use std::time::Duration;

/// Default remote endpoint (`host:port`).
pub const DEFAULT_ADDRESS: &str = "localhost:8080";

/// Sub-protocol advertised in the `Sec-WebSocket-Protocol` header.
pub const DEFAULT_SUB_PROTOCOL: &str = "binary";

/// Largest chunk read from terminal input in one iteration.
pub const READ_CHUNK_SIZE: usize = 128;

/// How long to wait for the peer to acknowledge our close frame.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// All runtime configuration for the terminal bridge.
///
/// # Example
///
/// ```rust
/// use wsterm::domain::ClientConfig;
///
/// let cfg = ClientConfig::default();
/// assert_eq!(cfg.endpoint_url(), "ws://localhost:8080/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host:port` of the remote WebSocket endpoint.
    pub address: String,

    /// Request path used for the upgrade handshake.
    pub path: String,

    /// Sub-protocol identifier offered during the handshake.
    pub sub_protocol: String,

    /// Capacity of the terminal read buffer; each read becomes one frame.
    pub read_chunk_size: usize,

    /// Upper bound on the wait for the peer's close acknowledgement.
    pub close_timeout: Duration,
}

impl ClientConfig {
    /// Builds a config for `address`, with every other field at its default.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Returns the `ws://` URL the client dials.
    pub fn endpoint_url(&self) -> String {
        format!("ws://{}{}", self.address, self.path)
    }
}

impl Default for ClientConfig {
    /// | Field           | Default          |
    /// |-----------------|------------------|
    /// | address         | `localhost:8080` |
    /// | path            | `/`              |
    /// | sub_protocol    | `binary`         |
    /// | read_chunk_size | 128              |
    /// | close_timeout   | 1 second         |
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            path: "/".to_string(),
            sub_protocol: DEFAULT_SUB_PROTOCOL.to_string(),
            read_chunk_size: READ_CHUNK_SIZE,
            close_timeout: CLOSE_TIMEOUT,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_address_is_local_8080() {
        // Arrange / Act
        let cfg = ClientConfig::default();
        // Assert
        assert_eq!(cfg.address, "localhost:8080");
    }

    #[test]
    fn test_default_wire_contract() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.path, "/");
        assert_eq!(cfg.sub_protocol, "binary");
    }

    #[test]
    fn test_default_chunk_size_is_128() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.read_chunk_size, 128);
    }

    #[test]
    fn test_default_close_timeout_is_one_second() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.close_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_endpoint_url_uses_address_and_root_path() {
        let cfg = ClientConfig::with_address("10.0.0.5:9000");
        assert_eq!(cfg.endpoint_url(), "ws://10.0.0.5:9000/");
    }

    #[test]
    fn test_with_address_keeps_other_defaults() {
        let cfg = ClientConfig::with_address("example.net:80");
        let defaults = ClientConfig::default();
        assert_eq!(cfg.sub_protocol, defaults.sub_protocol);
        assert_eq!(cfg.read_chunk_size, defaults.read_chunk_size);
        assert_eq!(cfg.close_timeout, defaults.close_timeout);
    }
}
