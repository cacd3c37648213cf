//! # Chat Client
//!
//! Owns one connection to the server. Construction generates the signing
//! keypair, connects, and performs the handshake; afterwards the client
//! sends signed messages and receives broadcast chat lines.

use tokio::net::TcpStream;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::handshake::send_hello;
use crate::protocol::message::{ChatLine, MessagePacket};
use crate::protocol::packet::write_packet;
use crate::transport::tcp::Connection;
use crate::utils::crypto::Identity;

pub struct ChatClient {
    conn: Connection<TcpStream>,
    identity: Identity,
    username: String,
}

impl ChatClient {
    /// Connect to the server and introduce ourselves.
    ///
    /// The keypair is generated here, once, and lives as long as the
    /// client; the private key never leaves it.
    #[instrument(skip(config), fields(server = %config.server_address, username = %config.username))]
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        config.ensure_valid()?;

        let identity = Identity::generate();
        let mut conn =
            Connection::connect(&config.server_address, config.connect_timeout).await?;
        send_hello(&mut conn, &config.username, &identity.export_public_key()).await?;

        Ok(Self {
            conn,
            identity,
            username: config.username,
        })
    }

    /// Sign `content` and send it as a message packet.
    ///
    /// Line breaks are stripped first so one send is always one chat line.
    pub async fn send(&mut self, content: &str) -> Result<()> {
        let content = content.replace(['\n', '\r'], "");
        let packet = MessagePacket::make_signed(content, &self.identity);
        debug!(user = %self.username, "sending message");
        write_packet(&mut self.conn, &packet).await
    }

    /// Receive the next broadcast chat line.
    pub async fn receive(&mut self) -> Result<ChatLine> {
        ChatLine::read(&mut self.conn).await
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Close the connection explicitly.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.conn.shutdown().await
    }
}
