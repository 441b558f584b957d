//! Error types for memcwire
//!
//! Provides a unified error type for codec, client and server operations.

use thiserror::Error;

/// Result type alias using McError
pub type Result<T> = std::result::Result<T, McError>;

/// Unified error type for memcwire operations
#[derive(Debug, Error)]
pub enum McError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the stream before sending the first header byte
    #[error("Connection closed")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Bad magic: expected 0x{expected:02x}, got 0x{found:02x}")]
    MagicMismatch { expected: u8, found: u8 },

    #[error("Body of {len} bytes is too big (max {max})")]
    OversizedBody { len: u32, max: u32 },

    #[error("Incomplete {section}: expected {expected} bytes, read {read}")]
    IncompleteFrame {
        section: &'static str,
        expected: usize,
        read: usize,
    },

    #[error("Malformed length: total body {total} < key {key} + extras {extras}")]
    MalformedLength { total: u32, key: u16, extras: u8 },

    #[error("{field} of {len} bytes does not fit the header (max {max})")]
    FieldTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },

    // -------------------------------------------------------------------------
    // Handler Errors
    // -------------------------------------------------------------------------
    /// The handler asked for the connection to be closed instead of answering
    #[error("Handler requested connection close")]
    HandlerFatal,

    #[error("Request handler is gone")]
    HandlerGone,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl McError {
    /// True when the error only means the peer went away
    ///
    /// Used by the server to keep ordinary disconnects out of the warning log.
    pub fn is_disconnect(&self) -> bool {
        match self {
            McError::ConnectionClosed => true,
            McError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}
