//! Sender actor: typed commands to outbound messages.

use chat_core::{status, Message, UserId, MAX_BODY_LEN, NULL_ID};
use chat_protocol::send_message;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::command::Command;
use crate::console::{self, ConsoleTx};
use crate::error::ClientError;
use crate::latch::Confirmation;
use crate::shared::ClientShared;

/// Process input lines until `close connection` or end of input, both of
/// which send a `DeregisterRequest` and end the actor.
pub async fn run_sender<W>(
    mut writer: W,
    mut lines: UnboundedReceiver<String>,
    shared: &ClientShared,
    console: &ConsoleTx,
) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    let me = shared.my_id;

    while let Some(line) = lines.recv().await {
        let Some(command) = Command::parse(&line) else {
            debug!(line = %line, "ignoring unrecognised input");
            continue;
        };

        match command {
            Command::Close => break,
            Command::ListUsers => console::show(console, shared.peers_line()),
            Command::SendTo { target, text } => {
                let Some(receiver) = parse_receiver(&target) else {
                    console::show(console, status::RECEIVER_NOT_FOUND);
                    continue;
                };
                if !fits(&text, console) {
                    continue;
                }

                let verdict = shared.latch.arm();
                send_message(&mut writer, &Message::direct(me, receiver, text.clone())).await?;

                match verdict.await {
                    Ok(Confirmation::Accepted) => {
                        console::show(console, console::delivered_line(&console::timestamp(), receiver, &text));
                    }
                    Ok(Confirmation::Rejected) => {}
                    // The receiver actor is gone, and with it the connection.
                    Err(_) => return Ok(()),
                }
            }
            Command::SendAll { text } => {
                if fits(&text, console) {
                    send_message(&mut writer, &Message::broadcast(me, text)).await?;
                }
            }
        }
    }

    send_message(&mut writer, &Message::deregister_request(me)).await?;
    Ok(())
}

/// Receiver id as typed, or `None` if it is not a number or is the
/// broadcast sentinel.
pub fn parse_receiver(target: &str) -> Option<UserId> {
    if !chat_protocol::wire_types::is_number(target) {
        return None;
    }
    match target.parse::<UserId>() {
        Ok(NULL_ID) | Err(_) => None,
        Ok(id) => Some(id),
    }
}

fn fits(text: &str, console: &ConsoleTx) -> bool {
    if text.len() > MAX_BODY_LEN {
        console::show(console, format!("Message too long (max {} bytes)", MAX_BODY_LEN));
        return false;
    }
    true
}
