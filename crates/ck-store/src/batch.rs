//! Transaction / batch engine.
//!
//! While a batch is open, state changes apply immediately but their
//! notifications are parked in a pending set keyed by [`EventKey`]. A later
//! event with the same key overwrites the earlier payload in place, so the
//! pending set keeps first-insertion order and the final value per key.
//!
//! The mutex here only protects the open flag and the pending set. Closing a
//! batch flips the flag and drains the set under the lock, then hands the
//! events back for delivery after the lock is released.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::event::{EventKey, StoreEvent};
use crate::store::CurveStore;

/// Ordered, deduplicated set of pending notifications.
#[derive(Debug, Default)]
pub struct PendingNotifications {
    events: Vec<StoreEvent>,
    index: HashMap<EventKey, usize>,
}

impl PendingNotifications {
    /// Record an event. Returns true if it replaced a pending event with the
    /// same key.
    pub fn push(&mut self, event: StoreEvent) -> bool {
        let key = event.key();
        match self.index.get(&key) {
            Some(&slot) => {
                self.events[slot] = event;
                true
            }
            None => {
                self.index.insert(key, self.events.len());
                self.events.push(event);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drain in first-insertion order.
    pub fn take(&mut self) -> Vec<StoreEvent> {
        self.index.clear();
        std::mem::take(&mut self.events)
    }
}

/// Where a notification request went.
#[derive(Debug)]
pub enum Routed {
    /// No batch open; the caller delivers the event now.
    Immediate(StoreEvent),
    /// Parked in the open batch.
    Queued { coalesced: bool },
}

#[derive(Debug, Default)]
struct BatchState {
    open: bool,
    pending: PendingNotifications,
}

#[derive(Debug, Default)]
pub struct BatchQueue {
    state: Mutex<BatchState>,
}

impl BatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a batch. Returns false if one is already open.
    pub fn begin(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.open {
            return false;
        }
        state.open = true;
        true
    }

    /// Close the open batch and return its pending events, or `None` if no
    /// batch was open.
    pub fn end(&self) -> Option<Vec<StoreEvent>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.open {
            return None;
        }
        state.open = false;
        Some(state.pending.take())
    }

    pub fn route(&self, event: StoreEvent) -> Routed {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.open {
            let coalesced = state.pending.push(event);
            Routed::Queued { coalesced }
        } else {
            Routed::Immediate(event)
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).open
    }

    pub fn pending_len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }
}

/// RAII batch scope returned by [`CurveStore::batch`].
///
/// Only the guard that actually opened the batch closes it on drop. A guard
/// created while another batch is open is inert.
#[must_use = "the batch closes as soon as the guard is dropped"]
pub struct BatchGuard<'a> {
    store: &'a CurveStore,
    owns: bool,
}

impl<'a> BatchGuard<'a> {
    pub(crate) fn new(store: &'a CurveStore, owns: bool) -> Self {
        Self { store, owns }
    }

    /// Whether dropping this guard will close the batch.
    pub fn owns_batch(&self) -> bool {
        self.owns
    }

    /// Close the batch now and return the number of delivered notifications.
    pub fn commit(mut self) -> usize {
        if self.owns {
            self.owns = false;
            self.store.end_batch()
        } else {
            0
        }
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        if self.owns {
            self.store.end_batch();
        }
    }
}
