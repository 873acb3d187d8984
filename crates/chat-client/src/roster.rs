//! The client's view of who is online.
//!
//! Eventually consistent with the server: it learns about peers from the
//! initial roster, from their first chat line (the join notice) and from
//! departure notices.

use chat_core::{ids::in_range, UserId, MAX_CLIENTS};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    active: [bool; MAX_CLIENTS],
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            active: [false; MAX_CLIENTS],
        }
    }
}

impl Roster {
    /// Roster seeded from a `ListResponse` body (`"0,2,5"`, or `""`).
    ///
    /// Entries that are not ids in range are skipped.
    pub fn from_list(body: &str) -> Self {
        let mut roster = Self::default();
        for token in body.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.parse::<UserId>() {
                Ok(id) if in_range(id, MAX_CLIENTS) => {
                    roster.mark(id);
                }
                _ => warn!(token, "ignoring bad roster entry"),
            }
        }
        roster
    }

    pub fn is_active(&self, id: UserId) -> bool {
        in_range(id, MAX_CLIENTS) && self.active[id as usize]
    }

    /// Mark `id` online. Returns `false` if `id` is out of range.
    pub fn mark(&mut self, id: UserId) -> bool {
        if !in_range(id, MAX_CLIENTS) {
            return false;
        }
        self.active[id as usize] = true;
        true
    }

    pub fn clear(&mut self, id: UserId) {
        if in_range(id, MAX_CLIENTS) {
            self.active[id as usize] = false;
        }
    }

    /// Active ids other than `me`, ascending.
    pub fn peers(&self, me: UserId) -> Vec<UserId> {
        (0..MAX_CLIENTS as UserId)
            .filter(|id| *id != me && self.active[*id as usize])
            .collect()
    }
}
