//! chat-client
//!
//! Terminal client for the group chat. After a registration handshake the
//! connection is driven by two actors sharing one [`shared::ClientShared`]:
//!
//! - the sender ([`sender`]) turns typed commands into messages and, for a
//!   direct message, waits for the server's verdict;
//! - the receiver ([`receiver`]) drains the socket, keeps the roster up to
//!   date and hands the verdict over through the confirmation latch.

pub mod command;
pub mod console;
pub mod error;
pub mod latch;
pub mod network;
pub mod receiver;
pub mod roster;
pub mod sender;
pub mod session;
pub mod shared;

pub use error::ClientError;
pub use session::SessionEnd;
