//! chat-protocol
//!
//! Wire-level encoding/decoding for the chat service.
//!
//! This crate turns logical [`chat_core::Message`]s into bytes on a socket
//! and back again, in two layers:
//!
//! - [`line_codec`] : `Message` <-> one delimiter-separated text line
//! - [`framing`]    : one line <-> one `[u16 BE length][payload]` frame
//!
//! Client and server both use this crate, so the header semantics cannot
//! drift between them.

pub mod error;
pub mod framing;
pub mod line_codec;
pub mod wire_types;

pub use error::ProtocolError;
pub use framing::{read_frame, recv_message, send_message, write_frame};
pub use line_codec::{decode, encode};
