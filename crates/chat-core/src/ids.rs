//! User identifiers and protocol-wide limits.

/// Public identifier of a chat session.
///
/// On the server this is the index of the session's slot. It is signed
/// because the wire carries `-1` as the "nobody / everybody" sentinel and
/// because a peer may send any syntactically valid integer, which must
/// survive decoding so the server can answer "Receiver not found".
pub type UserId = i32;

/// Sentinel id: no sender (server-originated) or no receiver (broadcast).
pub const NULL_ID: UserId = -1;

/// Upper bound on simultaneously registered users.
pub const MAX_CLIENTS: usize = 15;

/// Largest body, in bytes, a message may carry.
pub const MAX_BODY_LEN: usize = 2047;

/// Returns `true` if `id` names a slot in a table of `capacity` slots.
pub fn in_range(id: UserId, capacity: usize) -> bool {
    usize::try_from(id).map_or(false, |idx| idx < capacity)
}
