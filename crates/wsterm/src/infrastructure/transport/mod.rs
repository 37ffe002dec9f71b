//! WebSocket transport built on `tokio-tungstenite`.
//!
//! [`dial`] performs the HTTP upgrade handshake, then splits the stream so
//! the read half can move into the inbound relay task while the main loop
//! keeps the write half. Each half is wrapped in an adapter implementing the
//! application ports.
//!
//! # Frame mapping
//!
//! | WebSocket message | Inbound (`WsFrameSource::recv`) |
//! |-------------------|---------------------------------|
//! | `Binary`          | payload bytes                   |
//! | `Text`            | UTF-8 bytes of the text         |
//! | `Ping` / `Pong`   | skipped (tungstenite answers pings) |
//! | `Close`           | `TransportError::PeerClosed`    |
//! | end of stream     | `TransportError::Ended`         |
//!
//! The write half must be closed with [`FrameSink::close`] before it is
//! dropped; otherwise the reply to a peer's close frame is never sent.

pub mod mock;

use anyhow::Context;
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use crate::application::ports::{FrameSink, FrameSource, TransportError};
use crate::domain::{ClientConfig, Frame};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of the connection.
pub struct WsFrameSink {
    inner: SplitSink<WsStream, WsMessage>,
}

/// Read half of the connection.
pub struct WsFrameSource {
    inner: SplitStream<WsStream>,
}

/// Opens the WebSocket described by `config`.
///
/// Sends the upgrade request to `config.endpoint_url()` with
/// `Sec-WebSocket-Protocol: <config.sub_protocol>`.
///
/// # Errors
///
/// Returns an error if the URL or header is malformed, the TCP connection
/// fails, or the server rejects the upgrade.
pub async fn dial(config: &ClientConfig) -> anyhow::Result<(WsFrameSink, WsFrameSource)> {
    let url = config.endpoint_url();

    let mut request = url
        .as_str()
        .into_client_request()
        .with_context(|| format!("invalid endpoint URL '{url}'"))?;
    let protocol = HeaderValue::from_str(&config.sub_protocol)
        .with_context(|| format!("invalid sub-protocol '{}'", config.sub_protocol))?;
    request.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, protocol);

    let (stream, response) = connect_async(request)
        .await
        .with_context(|| format!("WebSocket handshake with {url} failed"))?;

    info!("connected to {url} (HTTP {})", response.status());
    if let Some(selected) = response.headers().get(SEC_WEBSOCKET_PROTOCOL) {
        debug!("server selected sub-protocol {selected:?}");
    }

    let (sink, source) = stream.split();
    Ok((WsFrameSink { inner: sink }, WsFrameSource { inner: source }))
}

/// Converts a domain frame into a tungstenite message.
fn to_ws_message(frame: Frame) -> WsMessage {
    match frame {
        Frame::Binary(bytes) => WsMessage::Binary(bytes),
        Frame::Close(status) => WsMessage::Close(Some(CloseFrame {
            code: CloseCode::from(status.code),
            reason: status.reason.into(),
        })),
    }
}

fn map_ws_error(e: WsError) -> TransportError {
    match e {
        WsError::ConnectionClosed | WsError::AlreadyClosed => TransportError::Ended,
        other => TransportError::Failed(Box::new(other)),
    }
}

#[async_trait]
impl FrameSink for WsFrameSink {
    async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        // SinkExt::send flushes, so the frame is on the wire when this returns.
        self.inner
            .send(to_ws_message(frame))
            .await
            .map_err(map_ws_error)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        // tungstenite only writes a queued close reply on the next read or
        // flush; the read half is gone by now, so this flush is the only one.
        match self.inner.close().await.map_err(map_ws_error) {
            Err(TransportError::Ended) => Ok(()),
            other => other,
        }
    }
}

#[async_trait]
impl FrameSource for WsFrameSource {
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        loop {
            let msg = match self.inner.next().await {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => return Err(map_ws_error(e)),
                None => return Err(TransportError::Ended),
            };

            match msg {
                WsMessage::Binary(bytes) => return Ok(bytes),
                WsMessage::Text(text) => return Ok(text.into_bytes()),
                WsMessage::Close(frame) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.into_owned()))
                        .unwrap_or((1005, String::new()));
                    return Err(TransportError::PeerClosed { code, reason });
                }
                WsMessage::Ping(data) => {
                    debug!("WebSocket ping ({} bytes)", data.len());
                }
                WsMessage::Pong(_) => {
                    debug!("WebSocket pong received");
                }
                WsMessage::Frame(_) => {
                    debug!("raw frame (ignored)");
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CloseStatus;

    #[test]
    fn test_binary_frame_maps_to_binary_message() {
        let msg = to_ws_message(Frame::Binary(b"hello".to_vec()));
        assert_eq!(msg, WsMessage::Binary(b"hello".to_vec()));
    }

    #[test]
    fn test_normal_close_maps_to_code_1000_empty_reason() {
        let msg = to_ws_message(Frame::Close(CloseStatus::normal()));
        match msg {
            WsMessage::Close(Some(frame)) => {
                assert_eq!(frame.code, CloseCode::Normal);
                assert!(frame.reason.is_empty());
            }
            other => panic!("expected close message, got {other:?}"),
        }
    }

    #[test]
    fn test_connection_closed_maps_to_ended() {
        assert!(matches!(
            map_ws_error(WsError::ConnectionClosed),
            TransportError::Ended
        ));
        assert!(matches!(
            map_ws_error(WsError::AlreadyClosed),
            TransportError::Ended
        ));
    }

    #[test]
    fn test_io_error_maps_to_failed() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(
            map_ws_error(WsError::Io(io)),
            TransportError::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_dial_refused_returns_error() {
        // Bind then drop a listener to get a port nobody is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ClientConfig::with_address(addr.to_string());
        let result = dial(&config).await;

        assert!(result.is_err());
    }
}
