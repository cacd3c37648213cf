//! # Stream Connection
//!
//! [`Connection`] turns any duplex byte stream into the framed reads and
//! writes the codec needs. It is generic over the stream so the server can
//! run the same code against a whole socket, or against the read and write
//! halves separately once a connection is split between tasks.
//!
//! `read_bytes` keeps pulling from the transport until the requested
//! length has accumulated; a peer that closes mid-read surfaces as
//! [`ProtocolError::AbruptEndOfStream`] carrying how many bytes arrived
//! before the stream ended.
//!
//! A `Connection` exclusively owns its stream. Dropping it closes the
//! socket; server exit paths also call [`Connection::shutdown`] explicitly
//! so teardown timing is deterministic rather than tied to drop order.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

use crate::core::codec::{StreamReader, StreamWriter};
use crate::error::{ProtocolError, Result};
use crate::utils::timeout::with_timeout_error;

/// A codec-capable wrapper around one exclusively-owned byte stream.
#[derive(Debug)]
pub struct Connection<S> {
    stream: S,
    peer: Option<SocketAddr>,
}

impl<S> Connection<S> {
    pub fn new(stream: S) -> Self {
        Self { stream, peer: None }
    }

    pub fn with_peer(stream: S, peer: SocketAddr) -> Self {
        Self {
            stream,
            peer: Some(peer),
        }
    }

    /// Address of the remote peer, when the transport knows one.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

impl Connection<TcpStream> {
    /// Open a TCP connection, bounded by `timeout`.
    ///
    /// Interactive chat traffic is latency-bound, so Nagle's algorithm is
    /// disabled on the socket.
    #[instrument(skip(timeout))]
    pub async fn connect(addr: &str, timeout: Duration) -> Result<Self> {
        let stream = with_timeout_error(
            async { Ok(TcpStream::connect(addr).await?) },
            timeout,
        )
        .await?;
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr().ok();
        debug!(peer = ?peer, "connected");
        Ok(Self { stream, peer })
    }

    /// Split into independently-owned read and write halves, so one task
    /// can read while broadcasts write from another.
    pub fn into_split(self) -> (Connection<OwnedReadHalf>, Connection<OwnedWriteHalf>) {
        let (read, write) = self.stream.into_split();
        (
            Connection {
                stream: read,
                peer: self.peer,
            },
            Connection {
                stream: write,
                peer: self.peer,
            },
        )
    }
}

impl<S: AsyncWrite + Unpin + Send> Connection<S> {
    /// Close the write direction, flushing buffered data first.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

#[async_trait]
impl<S: AsyncRead + Unpin + Send> StreamReader for Connection<S> {
    async fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut result = vec![0u8; length];
        let mut got = 0usize;
        while got < length {
            let n = self.stream.read(&mut result[got..]).await?;
            if n == 0 {
                return Err(ProtocolError::AbruptEndOfStream {
                    wanted: length,
                    got,
                });
            }
            got += n;
        }
        Ok(result)
    }
}

#[async_trait]
impl<S: AsyncWrite + Unpin + Send> StreamWriter for Connection<S> {
    async fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.stream.write_all(data).await?;
        self.stream.flush().await?;
        Ok(())
    }
}
