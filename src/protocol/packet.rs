//! # Packet Framing & Dispatch
//!
//! A packet frame is a fixed 16-bit packet ID followed by the packet's own
//! field encoding. The [`PacketRegistry`] maps IDs to decoders and is built
//! once at startup; registering the same ID twice is a startup-time defect
//! and asserts immediately rather than surfacing at runtime.
//!
//! Read failures are classified so the server can log precisely what a
//! misbehaving peer sent: the ID itself failed to arrive
//! ([`ProtocolError::MalformedPacketId`]), the ID is unknown
//! ([`ProtocolError::UnrecognizedPacketId`]), or the body decode failed
//! ([`ProtocolError::MalformedPacketBody`], carrying the ID and cause).

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::core::codec::{StreamReader, StreamWriter};
use crate::error::{ProtocolError, Result};
use crate::protocol::message::MessagePacket;

/// Write capability of a concrete packet variant.
///
/// Every variant carries a stable, process-wide-unique numeric ID and
/// serializes its fields through the codec's writer operations. The
/// matching decoder lives in the [`PacketRegistry`].
#[async_trait]
pub trait Packet: Send + Sync {
    /// Stable identifier written ahead of the packet body.
    fn id(&self) -> u16;

    /// Serialize the packet's fields, in declared order.
    async fn write(&self, writer: &mut dyn StreamWriter) -> Result<()>;
}

/// Every packet variant the protocol can decode.
///
/// The packet set in scope is fixed, so decoded packets come back as a
/// closed enum and callers dispatch with a plain `match`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyPacket {
    Message(MessagePacket),
}

impl AnyPacket {
    pub fn id(&self) -> u16 {
        match self {
            AnyPacket::Message(packet) => packet.id(),
        }
    }
}

type PacketDecoder = for<'a> fn(&'a mut dyn StreamReader) -> BoxFuture<'a, Result<AnyPacket>>;

fn decode_message(reader: &mut dyn StreamReader) -> BoxFuture<'_, Result<AnyPacket>> {
    Box::pin(async move { Ok(AnyPacket::Message(MessagePacket::read(reader).await?)) })
}

/// Immutable ID → decoder table, built once at process start.
pub struct PacketRegistry {
    decoders: HashMap<u16, PacketDecoder>,
}

impl PacketRegistry {
    /// An empty registry. Most callers want [`PacketRegistry::builtin`].
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// The registry holding every packet variant this crate knows.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(MessagePacket::ID, decode_message);
        registry
    }

    /// Register a decoder for a packet ID.
    ///
    /// Duplicate IDs are a defect in the packet set, not a runtime
    /// condition, and are rejected while the registry is being built.
    pub fn register(&mut self, id: u16, decoder: PacketDecoder) {
        let previous = self.decoders.insert(id, decoder);
        assert!(previous.is_none(), "duplicate packet id: {id}");
    }

    /// Read one packet frame: a 16-bit ID, then the body of the variant
    /// the ID names.
    pub async fn read_packet(&self, reader: &mut dyn StreamReader) -> Result<AnyPacket> {
        let id = reader
            .read_u16()
            .await
            .map_err(|e| ProtocolError::MalformedPacketId(Box::new(e)))?;

        let decoder = self
            .decoders
            .get(&id)
            .ok_or(ProtocolError::UnrecognizedPacketId(id))?;

        decoder(reader)
            .await
            .map_err(|e| ProtocolError::MalformedPacketBody {
                id,
                source: Box::new(e),
            })
    }
}

impl Default for PacketRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Write one packet frame: the packet's ID, then its body.
pub async fn write_packet(writer: &mut dyn StreamWriter, packet: &dyn Packet) -> Result<()> {
    writer.write_u16(packet.id()).await?;
    packet.write(writer).await
}
