//! # Services
//!
//! The connection-multiplexing server and the chat client built on the
//! protocol layer.

pub mod client;
pub mod server;

pub use client::ChatClient;
pub use server::{ChatServer, ConnectionId, ServerHandle};
