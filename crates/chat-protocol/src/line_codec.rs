//! Line encoding/decoding for chat messages.
//!
//! This module converts between:
//! - one encoded line (`&[u8]`, UTF-8)
//! - a high-level `chat_core::Message`
//!
//! Line layout (`<GS>` is the 0x1D group separator):
//!
//! ```text
//! kind<GS>receiver_id<GS>sender_id<GS>body
//! ```
//!
//! - `kind`, `receiver_id`, `sender_id`: signed decimal integers; `-1` is
//!   the null id.
//! - `body`: everything after the third separator, possibly empty.
//!
//! NOTE: This module handles **one message per buffer**. The 16-bit
//! length prefix that delimits lines on a stream lives in `framing`.

use std::fmt::Write as _;

use chat_core::{Message, MessageKind, MAX_BODY_LEN};

use crate::error::ProtocolError;
use crate::wire_types::{is_number, FIELD_COUNT, SEPARATOR};

/// Encode a single message as one line.
///
/// The encoded bytes are appended to `out`.
pub fn encode(msg: &Message, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    if msg.body.len() > MAX_BODY_LEN {
        return Err(ProtocolError::BodyTooLong(msg.body.len()));
    }

    let mut line = String::with_capacity(msg.body.len() + 16);
    // Writing into a String cannot fail.
    let _ = write!(
        line,
        "{}{sep}{}{sep}{}{sep}",
        msg.kind.as_i32(),
        msg.receiver_id,
        msg.sender_id,
        sep = SEPARATOR
    );
    line.push_str(&msg.body);

    out.extend_from_slice(line.as_bytes());
    Ok(())
}

/// Decode a single message from one line.
///
/// The buffer must contain exactly one line as described above.
pub fn decode(buf: &[u8]) -> Result<Message, ProtocolError> {
    if buf.is_empty() {
        return Err(ProtocolError::Empty);
    }

    let line = std::str::from_utf8(buf).map_err(|_| ProtocolError::InvalidUtf8)?;
    let mut fields = line.splitn(FIELD_COUNT, SEPARATOR);

    let kind_raw = parse_field(fields.next(), "kind")?;
    let receiver_id = parse_field(fields.next(), "receiver_id")?;
    let sender_id = parse_field(fields.next(), "sender_id")?;
    let body = fields.next().ok_or(ProtocolError::MissingField("body"))?;

    let kind = MessageKind::from_i32(kind_raw).ok_or(ProtocolError::UnknownMessageType(kind_raw))?;

    if body.len() > MAX_BODY_LEN {
        return Err(ProtocolError::BodyTooLong(body.len()));
    }

    Ok(Message {
        kind,
        receiver_id,
        sender_id,
        body: body.to_string(),
    })
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn parse_field(token: Option<&str>, field: &'static str) -> Result<i32, ProtocolError> {
    let token = token.ok_or(ProtocolError::MissingField(field))?;

    // Syntax first, so "+1", " 1" and "1e3" never reach the integer parser.
    if !is_number(token) {
        return Err(invalid(field, token));
    }
    token.parse::<i32>().map_err(|_| invalid(field, token))
}

fn invalid(field: &'static str, token: &str) -> ProtocolError {
    ProtocolError::InvalidNumber {
        field,
        value: token.to_string(),
    }
}
