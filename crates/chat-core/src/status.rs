//! Fixed bodies the server uses for errors and confirmations.
//!
//! Clients match on these strings, so both sides must agree on them exactly.

/// Error: the registry has no free slot.
pub const USER_LIMIT_EXCEEDED: &str = "User limit exceeded";

/// Error: deregistration (or chat) from a connection with no slot.
pub const USER_NOT_FOUND: &str = "User not found";

/// Error: direct message to an id that is out of range or inactive.
pub const RECEIVER_NOT_FOUND: &str = "Receiver not found";

/// Ack: the sender's slot was released.
pub const REMOVED_SUCCESSFULLY: &str = "Removed Successfully";

/// Ack: a direct message was delivered.
pub const DELIVERED: &str = "OK";

/// Body of a `RegisterRequest`.
pub const REGISTER_BODY: &str = "REQ_ADD";

/// Body of a `DeregisterRequest`.
pub const DEREGISTER_BODY: &str = "REQ_REM";

/// Prefix of the copy of a broadcast echoed back to its author.
pub const BROADCAST_ECHO_PREFIX: &str = "-> all ";

/// Join notice broadcast when `id` registers.
pub fn joined(id: crate::UserId) -> String {
    format!("User {} joined the group!", id)
}

/// Departure notice printed by clients when `id` leaves.
pub fn left(id: crate::UserId) -> String {
    format!("User {} left the group!", id)
}
