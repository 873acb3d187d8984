//! The single message type exchanged in both directions.
//!
//! `Message` is **transport-agnostic**: the line codec and framing live in
//! the `chat-protocol` crate; this module is purely logical.

use crate::ids::{UserId, MAX_BODY_LEN, NULL_ID};
use crate::kind::MessageKind;
use crate::status;

/// A chat event.
///
/// `receiver_id == NULL_ID` on a `Chat` means broadcast. Server-originated
/// messages (errors, acks, roster lists) carry `sender_id == NULL_ID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub receiver_id: UserId,
    pub sender_id: UserId,
    pub body: String,
}

impl Message {
    pub fn new(kind: MessageKind, sender_id: UserId, receiver_id: UserId, body: impl Into<String>) -> Self {
        Self {
            kind,
            receiver_id,
            sender_id,
            body: body.into(),
        }
    }

    /// Join request sent by a client that has no id yet.
    pub fn register_request() -> Self {
        Self::new(MessageKind::RegisterRequest, NULL_ID, NULL_ID, status::REGISTER_BODY)
    }

    /// Leave request, also relayed by the server as a departure notice.
    pub fn deregister_request(sender_id: UserId) -> Self {
        Self::new(MessageKind::DeregisterRequest, sender_id, NULL_ID, status::DEREGISTER_BODY)
    }

    /// Roster snapshot, `roster` already comma-joined.
    pub fn list_response(roster: impl Into<String>) -> Self {
        Self::new(MessageKind::ListResponse, NULL_ID, NULL_ID, roster)
    }

    /// Chat to everybody but the sender.
    pub fn broadcast(sender_id: UserId, body: impl Into<String>) -> Self {
        Self::new(MessageKind::Chat, sender_id, NULL_ID, body)
    }

    /// Chat to one user.
    pub fn direct(sender_id: UserId, receiver_id: UserId, body: impl Into<String>) -> Self {
        Self::new(MessageKind::Chat, sender_id, receiver_id, body)
    }

    pub fn error(receiver_id: UserId, body: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, NULL_ID, receiver_id, body)
    }

    pub fn ack(receiver_id: UserId, body: impl Into<String>) -> Self {
        Self::new(MessageKind::Ack, NULL_ID, receiver_id, body)
    }

    pub fn is_broadcast(&self) -> bool {
        self.receiver_id == NULL_ID
    }

    /// Copy of a broadcast as echoed back to its author: body prefixed with
    /// `"-> all "` and cut back to [`MAX_BODY_LEN`] on a char boundary.
    pub fn broadcast_echo(&self) -> Self {
        let mut body = String::with_capacity(status::BROADCAST_ECHO_PREFIX.len() + self.body.len());
        body.push_str(status::BROADCAST_ECHO_PREFIX);
        body.push_str(&self.body);
        truncate_on_char_boundary(&mut body, MAX_BODY_LEN);

        Self {
            body,
            ..self.clone()
        }
    }
}

/// Shorten `s` to at most `max` bytes without splitting a UTF-8 sequence.
pub fn truncate_on_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_is_prefixed_and_bounded() {
        let msg = Message::broadcast(3, "é".repeat(MAX_BODY_LEN / 2));
        let echo = msg.broadcast_echo();

        assert!(echo.body.starts_with("-> all "));
        assert!(echo.body.len() <= MAX_BODY_LEN);
        assert_eq!(echo.sender_id, 3);
        assert!(echo.is_broadcast());
    }

    #[test]
    fn short_echo_is_untouched_apart_from_prefix() {
        let echo = Message::broadcast(0, "hello").broadcast_echo();
        assert_eq!(echo.body, "-> all hello");
    }
}
