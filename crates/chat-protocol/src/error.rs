use thiserror::Error;

use chat_core::MAX_BODY_LEN;

/// Errors that can arise when encoding/decoding a line or moving a frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Nothing to decode.
    #[error("empty message")]
    Empty,

    /// The line ended before this field.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A numeric field was not a valid `i32`.
    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Integer kind outside the kind table.
    #[error("unknown message type: {0}")]
    UnknownMessageType(i32),

    #[error("body too long: {0} bytes (max {max})", max = MAX_BODY_LEN)]
    BodyTooLong(usize),

    /// Payload does not fit the 16-bit length prefix.
    #[error("frame too large: {0} bytes")]
    FrameTooLarge(usize),

    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
}
