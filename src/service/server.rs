//! # Chat Server
//!
//! Accepts connections, authenticates handshakes, verifies signed
//! messages and broadcasts them to every other connected client.
//!
//! ## Connection Lifecycle
//! ```text
//! Connecting ──accept──▶ Handshaking ──hello read──▶ Active ──▶ Closed
//!                            │                         │
//!                            └── read failure/timeout ─┴── disconnect,
//!                                (nothing registered)      malformed frame,
//!                                                          failed verification
//! ```
//!
//! Each accepted socket is handled by its own task; the active-peer map is
//! shared behind a mutex and each peer's write half sits behind its own
//! mutex, so no transport handle is ever written from two paths at once.
//! Peers are keyed by a `ConnectionId` issued at accept time, never by the
//! socket handle itself.
//!
//! Failures on one connection are absorbed at that connection's task
//! boundary and downgraded to "close this connection"; they never affect
//! the accept loop or other peers.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, instrument, warn};

use crate::config::{ServerConfig, SYSTEM_SENDER};
use crate::error::Result;
use crate::protocol::handshake::read_hello;
use crate::protocol::message::ChatLine;
use crate::protocol::packet::{AnyPacket, PacketRegistry};
use crate::transport::tcp::Connection;
use crate::utils::crypto::PeerKey;
use crate::utils::timeout::with_timeout_error;

/// Identifier issued to each accepted connection.
pub type ConnectionId = u64;

/// Server-side record of an authenticated, currently connected client.
struct Peer {
    username: String,
    public_key: PeerKey,
    addr: SocketAddr,
    writer: Arc<Mutex<Connection<OwnedWriteHalf>>>,
}

struct ServerState {
    clients: Mutex<HashMap<ConnectionId, Peer>>,
    next_id: AtomicU64,
    registry: PacketRegistry,
    handshake_timeout: Duration,
    motd: String,
}

impl ServerState {
    /// Deliver one chat line to every active peer except `from`.
    ///
    /// Best-effort per peer: a failed delivery is logged and skipped, the
    /// remaining peers still get the line.
    async fn broadcast(&self, from: ConnectionId, sender: &str, content: &str) {
        let line = ChatLine {
            sender: sender.to_string(),
            content: content.to_string(),
        };
        let clients = self.clients.lock().await;
        for (peer_id, peer) in clients.iter() {
            if *peer_id == from {
                continue;
            }
            let mut writer = peer.writer.lock().await;
            if let Err(e) = line.write(&mut *writer).await {
                warn!(user = %peer.username, error = %e, "failed to deliver broadcast");
            }
        }
    }

    /// Stored public key for a connection, if it is still active.
    async fn public_key_of(&self, id: ConnectionId) -> Option<PeerKey> {
        self.clients
            .lock()
            .await
            .get(&id)
            .map(|peer| peer.public_key.clone())
    }

    /// Remove a peer from the active set and close its transport.
    async fn remove(&self, id: ConnectionId) {
        let peer = self.clients.lock().await.remove(&id);
        match peer {
            Some(peer) => {
                let mut writer = peer.writer.lock().await;
                if let Err(e) = writer.shutdown().await {
                    debug!(user = %peer.username, error = %e, "error closing transport");
                }
                info!(user = %peer.username, peer = %peer.addr, "disconnected");
            }
            None => {
                debug!(id, "ignoring disconnect for untracked connection");
            }
        }
    }

    /// Close every active transport exactly once and empty the set.
    async fn close_all(&self) {
        let mut clients = self.clients.lock().await;
        for (_, peer) in clients.drain() {
            let mut writer = peer.writer.lock().await;
            if let Err(e) = writer.shutdown().await {
                debug!(user = %peer.username, error = %e, "error closing transport");
            }
        }
    }
}

/// The chat server: one listening socket and a set of active peers.
pub struct ChatServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl ChatServer {
    /// Bind the listening socket. The packet registry is built here, once,
    /// before any connection can arrive.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        config.ensure_valid()?;

        let listener = match TcpListener::bind(&config.address).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(
                    address = %config.address,
                    "unable to bind server (maybe this address is already in use?)"
                );
                return Err(e.into());
            }
        };
        info!(address = %config.address, "server bound");

        Ok(Self {
            listener,
            state: Arc::new(ServerState {
                clients: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                registry: PacketRegistry::builtin(),
                handshake_timeout: config.handshake_timeout,
                motd: config.motd,
            }),
        })
    }

    /// The address actually bound, useful when the port was 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// An introspection handle that stays valid while the server runs.
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("received CTRL+C signal, shutting down");
                let _ = shutdown_tx.send(()).await;
            }
        });

        self.run_with_shutdown(shutdown_rx).await
    }

    /// Run until the shutdown channel fires, then close every owned
    /// transport and return.
    pub async fn run_with_shutdown(self, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
        info!("listening for connections");

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("shutting down server");
                    self.state.close_all().await;
                    return Ok(());
                }

                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, addr)) => {
                            debug!(peer = %addr, "accepted new connection");
                            let state = Arc::clone(&self.state);
                            tokio::spawn(handle_connection(state, stream, addr));
                        }
                        Err(e) => {
                            error!(error = %e, "error accepting connection");
                        }
                    }
                }
            }
        }
    }
}

/// Cloneable view into the active-peer set.
#[derive(Clone)]
pub struct ServerHandle {
    state: Arc<ServerState>,
}

impl ServerHandle {
    pub async fn client_count(&self) -> usize {
        self.state.clients.lock().await.len()
    }

    pub async fn active_users(&self) -> Vec<String> {
        self.state
            .clients
            .lock()
            .await
            .values()
            .map(|peer| peer.username.clone())
            .collect()
    }
}

/// Drive one connection from handshake to teardown.
#[instrument(skip_all, fields(peer = %addr))]
async fn handle_connection(state: Arc<ServerState>, stream: TcpStream, addr: SocketAddr) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!(error = %e, "could not disable nagle");
    }
    let (mut reader, writer) = Connection::with_peer(stream, addr).into_split();

    // Handshaking: bounded, so a stalled client cannot hold the slot open.
    // On any failure the socket closes with nothing registered; the
    // broadcast path never observes a partial client.
    let hello = match with_timeout_error(read_hello(&mut reader), state.handshake_timeout).await {
        Ok(hello) => hello,
        Err(e) => {
            error!(error = %e, "dropping connection - handshake was not completed properly");
            let mut writer = writer;
            let _ = writer.shutdown().await;
            return;
        }
    };

    let id = state.next_id.fetch_add(1, Ordering::Relaxed);
    let username = hello.username.clone();
    let writer = Arc::new(Mutex::new(writer));
    state.clients.lock().await.insert(
        id,
        Peer {
            username: username.clone(),
            public_key: hello.public_key,
            addr,
            writer: Arc::clone(&writer),
        },
    );
    info!(user = %username, "client joined");

    if !state.motd.is_empty() {
        let greeting = ChatLine {
            sender: SYSTEM_SENDER.to_string(),
            content: state.motd.clone(),
        };
        let mut writer = writer.lock().await;
        if let Err(e) = greeting.write(&mut *writer).await {
            warn!(user = %username, error = %e, "failed to deliver motd");
        }
    }

    // Active: one framed message at a time, verified against the stored
    // key before anyone else sees it.
    loop {
        match state.registry.read_packet(&mut reader).await {
            Ok(AnyPacket::Message(message)) => {
                let Some(public_key) = state.public_key_of(id).await else {
                    // Already removed (server shutdown); stop reading.
                    return;
                };

                if message.verify(&public_key) {
                    info!(user = %username, "accepted message");
                    state.broadcast(id, &username, &message.content).await;
                } else {
                    warn!(user = %username, "dropping connection - received incorrect verification");
                    let notice =
                        format!("{username} has been kicked for incorrect verification.");
                    state.broadcast(id, SYSTEM_SENDER, &notice).await;
                    state.remove(id).await;
                    return;
                }
            }
            Err(e) => {
                debug!(user = %username, error = %e, "dropping connection - invalid or ended stream");
                state.remove(id).await;
                return;
            }
        }
    }
}
