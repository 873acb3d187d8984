//! chat-core
//!
//! Pure group-chat logic:
//! - messages (kinds, ids, bodies)
//! - well-known status texts
//! - the bounded session slot table the server's registry is built on

pub mod ids;
pub mod kind;
pub mod message;
pub mod slot_table;
pub mod status;

pub use ids::{UserId, MAX_BODY_LEN, MAX_CLIENTS, NULL_ID};
pub use kind::MessageKind;
pub use message::Message;
pub use slot_table::SlotTable;
