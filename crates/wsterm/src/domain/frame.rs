//! Frames sent to the peer.
//!
//! The bridge only ever originates two kinds of frame: binary data carrying
//! terminal input, and a single close control frame during shutdown.

/// WebSocket status code for a normal closure.
pub const NORMAL_CLOSURE: u16 = 1000;

/// Status carried by a close control frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseStatus {
    /// RFC 6455 status code.
    pub code: u16,
    /// Human-readable reason; may be empty.
    pub reason: String,
}

impl CloseStatus {
    /// Code 1000 with an empty reason.
    pub fn normal() -> Self {
        Self {
            code: NORMAL_CLOSURE,
            reason: String::new(),
        }
    }
}

/// An outbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Raw terminal bytes, forwarded unchanged.
    Binary(Vec<u8>),
    /// Close handshake initiation.
    Close(CloseStatus),
}

impl Frame {
    /// Short type name for log messages (never includes payload bytes).
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Binary(_) => "Binary",
            Frame::Close(_) => "Close",
        }
    }
}
