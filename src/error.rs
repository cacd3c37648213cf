//! # Error Types
//!
//! Unified error handling for the chat protocol.
//!
//! This module defines all error variants that can occur during protocol
//! operations, from low-level codec failures to connection teardown.
//!
//! ## Error Categories
//! - **Codec errors**: values outside a declared width, varints that
//!   overflow their bit budget, invalid UTF-8 payloads
//! - **Transport errors**: I/O failures and streams that end mid-read
//! - **Framing errors**: malformed or unrecognized packet frames, each
//!   carrying the offending packet ID when it is known
//! - **Session errors**: handshake and configuration failures
//!
//! Signature verification failure is deliberately *not* an error variant:
//! verifying a message returns `bool`, and the server treats `false` as an
//! authentication event (kick), never as a transport fault.
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use thiserror::Error;

/// Primary error type for all protocol operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A value handed to an encode operation does not fit the declared
    /// width. Always a caller-side defect; never produced while decoding.
    #[error("value out of range: {0}")]
    Range(String),

    /// A varint being decoded exceeded its declared bit budget. Detected
    /// incrementally, after each byte of the encoding.
    #[error("received varint outside the range of a {max_bits}-bit int")]
    VarIntOutOfRange { max_bits: u32 },

    /// The underlying stream ended before the requested number of bytes
    /// arrived. `got == 0` means the peer produced no data at all.
    #[error("stream ended abruptly (got {got} bytes, but expected {wanted} bytes)")]
    AbruptEndOfStream { wanted: usize, got: usize },

    #[error("failed to read packet id")]
    MalformedPacketId(#[source] Box<ProtocolError>),

    #[error("unrecognized packet id: {0}")]
    UnrecognizedPacketId(u16),

    #[error("malformed body for packet id {id}")]
    MalformedPacketBody {
        id: u16,
        #[source]
        source: Box<ProtocolError>,
    },

    #[error("invalid utf-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("invalid public key: {0}")]
    InvalidKey(String),

    #[error("handshake failed: {0}")]
    HandshakeError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("operation timed out")]
    Timeout,
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
