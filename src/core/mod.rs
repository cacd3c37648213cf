//! # Core Protocol Components
//!
//! Low-level wire encoding for the chat protocol.
//!
//! This module provides the foundation everything else builds on: the
//! reader/writer capability traits and the primitive value encodings.
//!
//! ## Components
//! - **Codec**: fixed-width values, variable-length integers and
//!   length-prefixed payloads over an abstract byte stream
//!
//! ## Wire Format
//! ```text
//! fixed values:  big-endian, declared width
//! varuint:       [7 value bits | continuation bit] per byte, LSB group first
//! varint:        varuint reinterpreted via two's complement
//! string/bytes:  varuint(byte_length) [payload(N)]
//! ```

pub mod codec;

pub use codec::{StreamReader, StreamWriter, LENGTH_PREFIX_BITS};
