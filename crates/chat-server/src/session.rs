//! Per-connection handler.
//!
//! One task per accepted socket. The socket is split: this task reads
//! frames and dispatches them, a writer task owns the write half and drains
//! the connection's outbound queue, so frames to one client are written
//! whole and in queue order.

use std::net::SocketAddr;
use std::time::Duration;

use chat_core::Message;
use chat_protocol::{recv_message, send_message, ProtocolError};
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::dispatch::{dispatch, release_slot, Connection, Flow};
use crate::types::{OutboundRx, SharedRegistry};

/// Run the I/O loop for a single connection until it ends.
///
/// Whatever ends the loop (deregistration, rejection, protocol violation,
/// decode or transport failure, idle timeout) the slot the connection held
/// is released before the socket is closed.
pub async fn run_session(stream: TcpStream, peer: SocketAddr, registry: SharedRegistry, idle_timeout: Option<Duration>) {
    let (mut read_half, write_half) = stream.into_split();
    let (out_tx, out_rx) = mpsc::unbounded_channel();

    let writer = tokio::spawn(run_writer(peer, write_half, out_rx));

    let mut conn = Connection::new(peer, out_tx);

    loop {
        match next_message(&mut read_half, idle_timeout).await {
            Ok(Some(msg)) => {
                if dispatch(&mut conn, &registry, msg).await == Flow::Close {
                    break;
                }
            }
            Ok(None) => {
                info!(%peer, "connection closed by peer");
                break;
            }
            Err(ReadError::Idle) => {
                info!(%peer, "idle timeout, closing");
                break;
            }
            Err(ReadError::Protocol(e)) => {
                warn!(%peer, "closing connection: {}", e);
                break;
            }
        }
    }

    release_slot(&mut conn, &registry).await;

    // Dropping our handle lets the writer flush what is queued and stop.
    drop(conn);
    if let Err(e) = writer.await {
        warn!(%peer, "writer task failed: {}", e);
    }
    debug!(%peer, "session finished");
}

enum ReadError {
    Idle,
    Protocol(ProtocolError),
}

async fn next_message(
    read_half: &mut OwnedReadHalf,
    idle_timeout: Option<Duration>,
) -> Result<Option<Message>, ReadError> {
    let read = recv_message(read_half);
    let result = match idle_timeout {
        Some(limit) => timeout(limit, read).await.map_err(|_| ReadError::Idle)?,
        None => read.await,
    };
    result.map_err(ReadError::Protocol)
}

/// Writer task: consume queued messages and write one frame each.
async fn run_writer(peer: SocketAddr, mut write_half: OwnedWriteHalf, mut out_rx: OutboundRx) {
    while let Some(msg) = out_rx.recv().await {
        if let Err(e) = send_message(&mut write_half, &msg).await {
            warn!(%peer, "write error: {}", e);
            return;
        }
    }
    let _ = write_half.shutdown().await;
}
