//! # Chat Messages
//!
//! [`MessagePacket`] is the client→server frame carrying one signed chat
//! message. [`ChatLine`] is the server→each-peer broadcast frame.
//!
//! The packet body writes the signature first and the content second; the
//! ordering is part of the wire contract and peers depend on it.

use async_trait::async_trait;

use crate::core::codec::{StreamReader, StreamWriter};
use crate::error::Result;
use crate::protocol::packet::Packet;
use crate::utils::crypto::{Identity, PeerKey};

/// A signed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePacket {
    /// Signature over the UTF-8 bytes of `content`.
    pub signature: Vec<u8>,
    pub content: String,
}

impl MessagePacket {
    pub const ID: u16 = 0;

    /// Create a message with `content` signed by the given identity.
    pub fn make_signed(content: impl Into<String>, identity: &Identity) -> Self {
        let content = content.into();
        let signature = identity.sign(content.as_bytes());
        Self { signature, content }
    }

    /// Check that the signature was produced by the private half of
    /// `public_key`. Returns `false` on any mismatch, never an error.
    pub fn verify(&self, public_key: &PeerKey) -> bool {
        public_key.verify(self.content.as_bytes(), &self.signature)
    }

    /// Decode the packet body: signature, then content.
    pub async fn read(reader: &mut dyn StreamReader) -> Result<Self> {
        let signature = reader.read_bytearray().await?;
        let content = reader.read_utf().await?;
        Ok(Self { signature, content })
    }
}

#[async_trait]
impl Packet for MessagePacket {
    fn id(&self) -> u16 {
        Self::ID
    }

    async fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
        writer.write_bytearray(&self.signature).await?;
        writer.write_utf(&self.content).await
    }
}

/// One delivered chat line, as broadcast by the server: the sender's
/// username, then the message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub sender: String,
    pub content: String,
}

impl ChatLine {
    pub async fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
        writer.write_utf(&self.sender).await?;
        writer.write_utf(&self.content).await
    }

    pub async fn read(reader: &mut dyn StreamReader) -> Result<Self> {
        let sender = reader.read_utf().await?;
        let content = reader.read_utf().await?;
        Ok(Self { sender, content })
    }
}
