//! Routing of inbound messages.
//!
//! Routing policy:
//! - `RegisterRequest`: admit into the registry, or `Error` and close when
//!   full. The join notice goes to every session.
//! - `DeregisterRequest`: `Ack` to the sender, release its slot, relay the
//!   request to everybody else as a departure notice, close.
//! - `Chat` to `NULL_ID`: to every other session, then an annotated echo
//!   back to the sender.
//! - `Chat` to an id: unicast plus `Ack("OK")`, or `Error` when the id is
//!   not an active session.
//! - anything else arriving at the server closes that connection.
//!
//! The registry lock is only held inside `SessionRegistry` calls, which
//! also queue the join and departure notices. Chat goes to cloned handles.

use std::net::SocketAddr;

use chat_core::{status, Message, MessageKind, UserId, NULL_ID};
use tracing::{debug, info, warn};

use crate::registry::{fan_out, RegistryError, SessionRegistry};
use crate::types::OutboundTx;

/// Per-connection state the dispatcher reads and updates.
#[derive(Debug)]
pub struct Connection {
    pub peer: SocketAddr,

    /// Slot held by this connection, once registered.
    pub slot: Option<UserId>,

    /// This connection's own outbound queue.
    pub outbound: OutboundTx,
}

impl Connection {
    pub fn new(peer: SocketAddr, outbound: OutboundTx) -> Self {
        Self {
            peer,
            slot: None,
            outbound,
        }
    }

    /// Queue `msg` for this connection's own client.
    fn reply(&self, msg: Message) {
        if self.outbound.send(msg).is_err() {
            warn!(peer = %self.peer, "writer gone, reply dropped");
        }
    }
}

/// What the connection handler should do after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

/// Route a single inbound message.
pub async fn dispatch(conn: &mut Connection, registry: &SessionRegistry, msg: Message) -> Flow {
    debug!(peer = %conn.peer, ?msg, "inbound");

    match msg.kind {
        MessageKind::RegisterRequest => register(conn, registry).await,
        MessageKind::DeregisterRequest => deregister(conn, registry, &msg).await,
        MessageKind::Chat if msg.is_broadcast() => broadcast_chat(conn, registry, msg).await,
        MessageKind::Chat => direct_chat(conn, registry, msg).await,
        MessageKind::ListResponse | MessageKind::Error | MessageKind::Ack => {
            warn!(peer = %conn.peer, kind = ?msg.kind, "protocol violation: unexpected kind, closing");
            Flow::Close
        }
    }
}

/// Release this connection's slot, if it holds one, and tell everyone else.
///
/// Called on every exit path of the connection handler.
pub async fn release_slot(conn: &mut Connection, registry: &SessionRegistry) {
    let Some(id) = conn.slot.take() else {
        return;
    };

    if registry.release(id).await {
        info!(id, peer = %conn.peer, "user removed");
    }
}

async fn register(conn: &mut Connection, registry: &SessionRegistry) -> Flow {
    if let Some(id) = conn.slot {
        warn!(id, peer = %conn.peer, "protocol violation: already registered, closing");
        return Flow::Close;
    }

    match registry.register(conn.outbound.clone()).await {
        Ok(id) => {
            conn.slot = Some(id);
            info!(id, peer = %conn.peer, "user added");
            Flow::Continue
        }
        Err(RegistryError::Full) => {
            info!(peer = %conn.peer, "registration rejected: user limit exceeded");
            conn.reply(Message::error(NULL_ID, status::USER_LIMIT_EXCEEDED));
            Flow::Close
        }
    }
}

async fn deregister(conn: &mut Connection, registry: &SessionRegistry, msg: &Message) -> Flow {
    let id = match conn.slot {
        Some(id) if id == msg.sender_id => id,
        _ => return unknown_user(conn, msg),
    };

    conn.reply(Message::ack(id, status::REMOVED_SUCCESSFULLY));
    release_slot(conn, registry).await;
    Flow::Close
}

fn unknown_user(conn: &Connection, msg: &Message) -> Flow {
    info!(sender = msg.sender_id, peer = %conn.peer, "deregistration of unknown user");
    conn.reply(Message::error(msg.sender_id, status::USER_NOT_FOUND));
    Flow::Close
}

async fn broadcast_chat(conn: &mut Connection, registry: &SessionRegistry, mut msg: Message) -> Flow {
    let Some(id) = registered_sender(conn, &msg) else {
        return Flow::Continue;
    };
    msg.sender_id = id;

    info!(sender = id, "broadcast: {}", msg.body);

    let targets = registry.others(id).await;
    fan_out(&targets, &msg);

    conn.reply(msg.broadcast_echo());
    Flow::Continue
}

async fn direct_chat(conn: &mut Connection, registry: &SessionRegistry, mut msg: Message) -> Flow {
    let Some(id) = registered_sender(conn, &msg) else {
        return Flow::Continue;
    };
    msg.sender_id = id;

    let receiver = msg.receiver_id;
    match registry.recipient(receiver).await {
        Some(target) => {
            if target.send(msg).is_err() {
                warn!(receiver, "receiver went away mid-delivery");
            }
            conn.reply(Message::ack(id, status::DELIVERED));
        }
        None => {
            info!(sender = id, receiver, "user not found");
            conn.reply(Message::error(id, status::RECEIVER_NOT_FOUND));
        }
    }
    Flow::Continue
}

/// Slot of the connection, or an `Error` reply when it has none.
///
/// The header's `sender_id` is not trusted; the connection's own slot is
/// what gets stamped on relayed chat.
fn registered_sender(conn: &Connection, msg: &Message) -> Option<UserId> {
    match conn.slot {
        Some(id) => {
            if msg.sender_id != id {
                debug!(claimed = msg.sender_id, actual = id, "sender id rewritten");
            }
            Some(id)
        }
        None => {
            info!(peer = %conn.peer, "chat from unregistered connection");
            conn.reply(Message::error(msg.sender_id, status::USER_NOT_FOUND));
            None
        }
    }
}
