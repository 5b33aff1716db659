//! Owner-context guard.
//!
//! The store trades locking for a single-writer guarantee: every mutation must
//! happen on the thread that constructed the store. A call from any other
//! thread is a programming error and panics in every build profile. There is
//! no log-and-continue path.

use std::thread::{self, ThreadId};

/// Records the owner thread and rejects access from any other.
#[derive(Debug, Clone)]
pub struct OwnerGuard {
    owner: ThreadId,
    label: String,
}

impl OwnerGuard {
    /// Bind the guard to the calling thread.
    pub fn current(label: impl Into<String>) -> Self {
        Self {
            owner: thread::current().id(),
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True when called from the owner thread.
    pub fn is_owner(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panic unless called from the owner thread.
    #[track_caller]
    pub fn assert_owner(&self, operation: &'static str) {
        if !self.is_owner() {
            let current = thread::current();
            panic!(
                "CurveStore::{operation} called from thread {:?} ({}), but the store is owned by the '{}' context ({:?})",
                current.id(),
                current.name().unwrap_or("unnamed"),
                self.label,
                self.owner,
            );
        }
    }
}
