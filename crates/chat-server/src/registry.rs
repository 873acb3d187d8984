//! Session registry: the only server-side shared mutable state.
//!
//! A [`SlotTable`] of connection handles behind one `RwLock`. Every
//! operation takes the lock for the shortest span it can and never does
//! socket I/O while holding it. Join and departure notices are queued
//! under the write lock; chat is relayed through cloned handles after the
//! lock is gone. Queuing onto a handle is a non-blocking channel push, the
//! socket write itself happens in that connection's writer task.

use chat_core::{status, Message, SlotTable, UserId};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::types::OutboundTx;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("user limit exceeded")]
    Full,
}

#[derive(Debug)]
pub struct SessionRegistry {
    slots: RwLock<SlotTable<OutboundTx>>,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: RwLock::new(SlotTable::new(capacity)),
        }
    }

    /// Admit `handle` into the lowest free slot and announce it.
    ///
    /// The capacity check and the allocation happen under one write lock.
    /// Before the lock is released the join notice is queued to every
    /// session, and the newcomer's own queue also gets the roster as it
    /// stands after the allocation, excluding the newcomer. The newcomer
    /// learns its id from the notice. Any later registry change queues its
    /// notices behind these, so every peer sees joins and departures in
    /// registry order.
    pub async fn register(&self, handle: OutboundTx) -> Result<UserId, RegistryError> {
        let mut slots = self.slots.write().await;
        if slots.is_full() {
            return Err(RegistryError::Full);
        }

        let id = slots.allocate(handle.clone()).map_err(|_| RegistryError::Full)?;
        let roster = slots.list_except(id);

        // The newcomer's receiver is alive: we are running on its task.
        let _ = handle.send(Message::broadcast(id, status::joined(id)));
        let _ = handle.send(Message::list_response(roster));

        fan_out(&slots.others(id), &Message::broadcast(id, status::joined(id)));
        debug!(id, active = slots.len(), "slot allocated");

        Ok(id)
    }

    /// Release slot `id` and queue its departure notice to everyone left.
    ///
    /// The notice is queued before the lock is dropped, so a newcomer
    /// reusing the slot is always announced after it. Returns `false` if
    /// `id` was not active.
    pub async fn release(&self, id: UserId) -> bool {
        let mut slots = self.slots.write().await;
        if slots.release(id).is_none() {
            return false;
        }

        fan_out(&slots.others(id), &Message::deregister_request(id));
        debug!(id, active = slots.len(), "slot released");
        true
    }

    /// Handle of an active session.
    pub async fn recipient(&self, id: UserId) -> Option<OutboundTx> {
        self.slots.read().await.get(id).cloned()
    }

    /// Handles of every active session except `skip`.
    pub async fn others(&self, skip: UserId) -> Vec<(UserId, OutboundTx)> {
        self.slots.read().await.others(skip)
    }

    /// Comma-joined active ids; `""` when nobody is registered.
    pub async fn list(&self) -> String {
        self.slots.read().await.list()
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }
}

/// Queue `msg` for every target. A target whose writer is gone is skipped.
///
/// Queuing never blocks, so this is safe to call with the registry lock
/// held.
pub(crate) fn fan_out(targets: &[(UserId, OutboundTx)], msg: &Message) {
    for (id, tx) in targets {
        if tx.send(msg.clone()).is_err() {
            warn!(to = *id, "delivery failed, session closing");
        }
    }
}
