//! Receiver actor: drains inbound messages.

use chat_core::{status, Message, MessageKind};
use chat_protocol::recv_message;
use tokio::io::AsyncRead;
use tracing::{debug, warn};

use crate::console::{self, ConsoleTx};
use crate::error::ClientError;
use crate::latch::Confirmation;
use crate::roster::Roster;
use crate::session::SessionEnd;
use crate::shared::ClientShared;

/// Receive until the server confirms our removal or the stream ends.
///
/// On any exit a pending direct-message latch is dropped, so the sender is
/// never left waiting for a verdict that cannot come.
pub async fn run_receiver<R>(mut reader: R, shared: &ClientShared, console: &ConsoleTx) -> Result<SessionEnd, ClientError>
where
    R: AsyncRead + Unpin,
{
    let result = loop {
        match recv_message(&mut reader).await {
            Ok(Some(msg)) => {
                if let Some(end) = handle_inbound(shared, console, msg) {
                    break Ok(end);
                }
            }
            Ok(None) => {
                warn!("server closed the connection");
                break Ok(SessionEnd::Disconnected);
            }
            Err(e) => break Err(e.into()),
        }
    };

    shared.latch.cancel();
    result
}

/// Apply one inbound message. Returns `Some` when the session is over.
pub fn handle_inbound(shared: &ClientShared, console: &ConsoleTx, msg: Message) -> Option<SessionEnd> {
    debug!(?msg, "inbound");

    match msg.kind {
        MessageKind::DeregisterRequest => {
            shared.roster().clear(msg.sender_id);
            console::show(console, status::left(msg.sender_id));
        }
        MessageKind::Chat => show_chat(shared, console, &msg),
        MessageKind::ListResponse => shared.replace_roster(Roster::from_list(&msg.body)),
        MessageKind::Ack if msg.body == status::REMOVED_SUCCESSFULLY => {
            console::show(console, msg.body);
            return Some(SessionEnd::Removed);
        }
        MessageKind::Ack => {
            shared.latch.resolve(Confirmation::Accepted);
        }
        MessageKind::Error => {
            if msg.body == status::RECEIVER_NOT_FOUND {
                shared.latch.resolve(Confirmation::Rejected);
            }
            console::show(console, msg.body);
        }
        MessageKind::RegisterRequest => warn!("ignoring RegisterRequest from server"),
    }
    None
}

/// The first line from a sender (its join notice) is shown bare and marks
/// it online; later ones get a timestamp.
fn show_chat(shared: &ClientShared, console: &ConsoleTx, msg: &Message) {
    let known = {
        let mut roster = shared.roster();
        let known = roster.is_active(msg.sender_id);
        if !known && !roster.mark(msg.sender_id) {
            warn!(sender = msg.sender_id, "chat from out-of-range sender");
        }
        known
    };

    if known {
        let line = console::chat_line(&console::timestamp(), shared.my_id, msg.sender_id, msg.receiver_id, &msg.body);
        console::show(console, line);
    } else {
        console::show(console, msg.body.clone());
    }
}
