//! # Transports
//!
//! Concrete byte-stream transports satisfying the codec capability traits.
//!
//! The protocol engine never talks to sockets directly; it talks to a
//! [`Connection`], which owns the stream and provides exact-length reads
//! and full writes over it.

pub mod tcp;

pub use tcp::Connection;
