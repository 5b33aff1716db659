//! Lightweight notification counters.
//!
//! Relaxed atomics; the counters are diagnostic only and never feed back into
//! store behavior.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationStats {
    /// Events delivered to the dispatcher (immediately or on batch close).
    pub dispatched: u64,
    /// Events that overwrote a pending event with the same key.
    pub coalesced: u64,
    /// Batches that were opened and closed.
    pub batches_closed: u64,
}

#[derive(Debug, Default)]
pub struct StatsCounters {
    dispatched: AtomicU64,
    coalesced: AtomicU64,
    batches_closed: AtomicU64,
}

impl StatsCounters {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
            batches_closed: AtomicU64::new(0),
        }
    }

    pub fn record_dispatch(&self, count: u64) {
        self.dispatched.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_closed(&self) {
        self.batches_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> NotificationStats {
        NotificationStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            batches_closed: self.batches_closed.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.coalesced.store(0, Ordering::Relaxed);
        self.batches_closed.store(0, Ordering::Relaxed);
    }
}
