//! One-shot hand-off of a direct message's verdict.
//!
//! The sender arms the latch *before* writing the message, so an answer
//! can never arrive ahead of it, then awaits the returned receiver. The
//! receiver actor resolves it when the `Ack` or `Error` shows up. The
//! `oneshot` channel carries the outcome itself: there is no flag to
//! re-check and no way to deliver it twice.

use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Rejected,
}

#[derive(Debug, Default)]
pub struct ConfirmationLatch {
    pending: Mutex<Option<oneshot::Sender<Confirmation>>>,
}

impl ConfirmationLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting for one verdict.
    pub fn arm(&self) -> oneshot::Receiver<Confirmation> {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.replace(tx).is_some() {
            warn!("confirmation latch re-armed while a verdict was outstanding");
        }
        rx
    }

    /// Hand `verdict` to the waiting sender.
    ///
    /// Returns `false` if nobody was waiting.
    pub fn resolve(&self, verdict: Confirmation) -> bool {
        let waiting = self.pending.lock().unwrap_or_else(PoisonError::into_inner).take();
        match waiting {
            Some(tx) => tx.send(verdict).is_ok(),
            None => {
                debug!(?verdict, "no direct message awaiting confirmation");
                false
            }
        }
    }

    /// Drop any outstanding latch; its waiter sees the channel close.
    pub fn cancel(&self) {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    pub fn is_armed(&self) -> bool {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}
