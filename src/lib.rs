//! # chat-protocol
//!
//! Signed chat protocol core: a byte-oriented wire codec, packet framing
//! and dispatch, and a connection-multiplexing server/client pair that
//! authenticates messages with asymmetric signatures.
//!
//! ## Layers
//! - [`core`]: reader/writer capability traits and the primitive value
//!   encodings (fixed-width, varint, length-prefixed payloads)
//! - [`protocol`]: packet frames, the registry, the signed message packet
//!   and the handshake
//! - [`transport`]: the stream [`Connection`](transport::Connection) that
//!   turns a raw byte channel into framed reads/writes
//! - [`service`]: [`ChatServer`] and [`ChatClient`]
//! - [`utils`]: identity keys, logging setup, timeouts
//!
//! Authenticity only: messages are signed and verified, never encrypted.
//!
//! ## Example
//! ```no_run
//! use chat_protocol::config::{ClientConfig, ServerConfig};
//! use chat_protocol::{ChatClient, ChatServer, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let server = ChatServer::bind(ServerConfig::default()).await?;
//!     tokio::spawn(server.run());
//!
//!     let mut client = ChatClient::connect(ClientConfig {
//!         username: "alice".to_string(),
//!         ..ClientConfig::default()
//!     })
//!     .await?;
//!     client.send("hello").await?;
//!     let line = client.receive().await?;
//!     println!("<{}> {}", line.sender, line.content);
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;
pub mod utils;

pub use error::{ProtocolError, Result};
pub use service::{ChatClient, ChatServer, ServerHandle};
