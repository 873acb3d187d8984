//! Bounded table of session slots.
//!
//! A slot is either empty or holds one connection handle `H`. The slot
//! index is the user's public id: unique while the slot is occupied and
//! handed out again, lowest index first, once it is vacated.
//!
//! The table itself does no locking. The server wraps it in a lock and only
//! ever mutates it through its registry, so the full-check in
//! [`SlotTable::allocate`] and the insertion are one atomic step.

use crate::ids::{in_range, UserId};

#[derive(Debug)]
pub struct SlotTable<H> {
    slots: Vec<Option<H>>,
    active: usize,
}

impl<H> SlotTable<H> {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, active: 0 }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    pub fn is_full(&self) -> bool {
        self.active >= self.slots.len()
    }

    pub fn is_active(&self, id: UserId) -> bool {
        self.get(id).is_some()
    }

    /// Handle stored in slot `id`, if that slot exists and is occupied.
    pub fn get(&self, id: UserId) -> Option<&H> {
        if !in_range(id, self.slots.len()) {
            return None;
        }
        self.slots[id as usize].as_ref()
    }

    /// Store `handle` in the lowest free slot and return its index.
    ///
    /// When every slot is taken the handle is given back in `Err` so the
    /// caller can still use it to report the rejection.
    pub fn allocate(&mut self, handle: H) -> Result<UserId, H> {
        match self.slots.iter().position(Option::is_none) {
            Some(idx) => {
                self.slots[idx] = Some(handle);
                self.active += 1;
                Ok(idx as UserId)
            }
            None => Err(handle),
        }
    }

    /// Empty slot `id`, returning the handle it held.
    pub fn release(&mut self, id: UserId) -> Option<H> {
        if !in_range(id, self.slots.len()) {
            return None;
        }
        let handle = self.slots[id as usize].take()?;
        self.active -= 1;
        Some(handle)
    }

    /// Occupied slots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (UserId, &H)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|h| (idx as UserId, h)))
    }

    /// Comma-joined active ids, e.g. `"0,2,5"`. An empty table yields `""`.
    pub fn list(&self) -> String {
        join_ids(self.iter().map(|(id, _)| id))
    }

    /// Like [`SlotTable::list`] but leaving out `skip`.
    pub fn list_except(&self, skip: UserId) -> String {
        join_ids(self.iter().map(|(id, _)| id).filter(|id| *id != skip))
    }
}

impl<H: Clone> SlotTable<H> {
    /// Cloned handles of every occupied slot except `skip`.
    pub fn others(&self, skip: UserId) -> Vec<(UserId, H)> {
        self.iter()
            .filter(|(id, _)| *id != skip)
            .map(|(id, h)| (id, h.clone()))
            .collect()
    }
}

fn join_ids(ids: impl Iterator<Item = UserId>) -> String {
    ids.map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}
