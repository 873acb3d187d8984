// crates/chat-client/src/network.rs

use chat_core::{Message, MessageKind, UserId};
use chat_protocol::{recv_message, send_message};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

use crate::error::ClientError;
use crate::roster::Roster;

/// Result of a successful registration handshake.
#[derive(Debug)]
pub struct Registration {
    pub id: UserId,

    /// Join notice text, shown to the user as the first line.
    pub welcome: String,

    /// Peers online at the moment we joined (not including us).
    pub roster: Roster,
}

/// Ask the server for a slot.
///
/// The server answers with either an `Error` or our own join notice (whose
/// sender is the id we were given), then with the current roster.
pub async fn register<S>(stream: &mut S) -> Result<Registration, ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    send_message(stream, &Message::register_request()).await?;

    let reply = next(stream).await?;
    let (id, welcome) = match reply.kind {
        MessageKind::Chat => (reply.sender_id, reply.body),
        MessageKind::Error => return Err(ClientError::Rejected(reply.body)),
        other => return Err(ClientError::UnexpectedReply(other)),
    };

    let list = next(stream).await?;
    if list.kind != MessageKind::ListResponse {
        return Err(ClientError::UnexpectedReply(list.kind));
    }
    debug!(roster = %list.body, "initial roster");
    info!(id, "registered");

    Ok(Registration {
        id,
        welcome,
        roster: Roster::from_list(&list.body),
    })
}

async fn next<S>(stream: &mut S) -> Result<Message, ClientError>
where
    S: AsyncRead + Unpin,
{
    recv_message(stream).await?.ok_or(ClientError::Closed)
}
