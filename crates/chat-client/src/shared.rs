//! State shared by the sender and receiver actors.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chat_core::UserId;

use crate::latch::ConfirmationLatch;
use crate::roster::Roster;

#[derive(Debug)]
pub struct ClientShared {
    /// Id the server assigned at registration.
    pub my_id: UserId,
    roster: Mutex<Roster>,
    pub latch: ConfirmationLatch,
}

impl ClientShared {
    /// The client always counts itself as online.
    pub fn new(my_id: UserId, mut roster: Roster) -> Self {
        roster.mark(my_id);
        Self {
            my_id,
            roster: Mutex::new(roster),
            latch: ConfirmationLatch::new(),
        }
    }

    pub fn roster(&self) -> MutexGuard<'_, Roster> {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the roster wholesale, keeping ourselves in it.
    pub fn replace_roster(&self, mut roster: Roster) {
        roster.mark(self.my_id);
        *self.roster() = roster;
    }

    /// Space-separated ids of everybody else online.
    pub fn peers_line(&self) -> String {
        self.roster()
            .peers(self.my_id)
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
