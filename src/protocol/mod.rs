//! # Protocol Layer
//!
//! Packet framing, the concrete packet set, and the handshake.
//!
//! ## Components
//! - **Packet**: frame format, registry and dispatch
//! - **Message**: the signed chat message packet and the broadcast line
//! - **Handshake**: the username + public key hello exchange

pub mod handshake;
pub mod message;
pub mod packet;

pub use handshake::{read_hello, send_hello, Hello};
pub use message::{ChatLine, MessagePacket};
pub use packet::{write_packet, AnyPacket, Packet, PacketRegistry};
