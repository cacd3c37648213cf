//! # Connection Handshake
//!
//! The fixed initial exchange a client performs once per connection,
//! before any message traffic: its username, then its exported public key,
//! both as UTF strings. A connection is not considered active until both
//! have been read and the key has parsed; any failure on the way closes
//! the socket with nothing registered.

use tracing::debug;

use crate::core::codec::{StreamReader, StreamWriter};
use crate::error::Result;
use crate::utils::crypto::PeerKey;

/// A completed client hello.
#[derive(Debug, Clone)]
pub struct Hello {
    pub username: String,
    pub public_key: PeerKey,
}

/// Client side: introduce ourselves to the server.
pub async fn send_hello(
    writer: &mut dyn StreamWriter,
    username: &str,
    public_key_export: &str,
) -> Result<()> {
    writer.write_utf(username).await?;
    writer.write_utf(public_key_export).await?;
    debug!(username, "sent hello");
    Ok(())
}

/// Server side: read the hello in the exact order the client sends it.
pub async fn read_hello(reader: &mut dyn StreamReader) -> Result<Hello> {
    let username = reader.read_utf().await?;
    let key_text = reader.read_utf().await?;
    let public_key = PeerKey::from_exported(&key_text)?;
    Ok(Hello {
        username,
        public_key,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use bytes::Bytes;

    use super::*;
    use crate::error::ProtocolError;
    use crate::utils::crypto::Identity;

    #[tokio::test]
    async fn hello_roundtrip() {
        let identity = Identity::generate();
        let mut buf = Vec::new();
        send_hello(&mut buf, "alice", &identity.export_public_key())
            .await
            .unwrap();

        let mut reader = Bytes::from(buf);
        let hello = read_hello(&mut reader).await.unwrap();
        assert_eq!(hello.username, "alice");
        assert_eq!(hello.public_key, identity.public_key());
    }

    #[tokio::test]
    async fn hello_truncated_after_username_fails() {
        let mut buf = Vec::new();
        buf.write_utf("alice").await.unwrap();

        let mut reader = Bytes::from(buf);
        assert!(matches!(
            read_hello(&mut reader).await,
            Err(ProtocolError::AbruptEndOfStream { .. })
        ));
    }

    #[tokio::test]
    async fn hello_with_bogus_key_fails() {
        let mut buf = Vec::new();
        buf.write_utf("alice").await.unwrap();
        buf.write_utf("definitely-not-a-key").await.unwrap();

        let mut reader = Bytes::from(buf);
        assert!(matches!(
            read_hello(&mut reader).await,
            Err(ProtocolError::InvalidKey(_))
        ));
    }
}
