//! Observer registry and synchronous notification delivery.
//!
//! Observers are registered per [`SignalKind`]. Delivery clones the observer
//! list under the registry lock and invokes the callbacks after the lock is
//! released, so an observer may subscribe, unsubscribe or mutate the store
//! from inside its callback.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::event::{SignalKind, StoreEvent};

/// Callback invoked with each delivered event.
pub type Observer = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Handle returned by subscribe, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct Dispatcher {
    observers: Mutex<HashMap<SignalKind, Vec<(SubscriptionId, Observer)>>>,
    next_id: AtomicU64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for one kind.
    pub fn subscribe(&self, kind: SignalKind, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push((id, observer));
        id
    }

    /// Remove an observer. Returns false if the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        let mut removed = false;
        for list in observers.values_mut() {
            let before = list.len();
            list.retain(|(sub, _)| *sub != id);
            removed |= list.len() != before;
        }
        removed
    }

    /// Number of observers registered for a kind.
    pub fn observer_count(&self, kind: SignalKind) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Deliver one event to every observer of its kind, in registration
    /// order. Returns the number of observers invoked.
    pub fn emit(&self, event: &StoreEvent) -> usize {
        let targets: Vec<Observer> = {
            let observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
            match observers.get(&event.kind()) {
                Some(list) => list.iter().map(|(_, obs)| Arc::clone(obs)).collect(),
                None => return 0,
            }
        };
        tracing::trace!(kind = %event.kind(), observers = targets.len(), "dispatch");
        for observer in &targets {
            observer(event);
        }
        targets.len()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<SignalKind, usize> =
            observers.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("Dispatcher").field("observers", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, Observer) {
        let count = Arc::new(AtomicUsize::new(0));
        let observer: Observer = {
            let count = Arc::clone(&count);
            Arc::new(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        (count, observer)
    }

    #[test]
    fn emit_reaches_only_matching_kind() {
        let dispatcher = Dispatcher::new();
        let (frames, frame_obs) = counter();
        let (views, view_obs) = counter();
        dispatcher.subscribe(SignalKind::FrameChanged, frame_obs);
        dispatcher.subscribe(SignalKind::ViewChanged, view_obs);

        assert_eq!(dispatcher.emit(&StoreEvent::FrameChanged { frame: 4 }), 1);
        assert_eq!(frames.load(Ordering::SeqCst), 1);
        assert_eq!(views.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let dispatcher = Dispatcher::new();
        let (count, obs) = counter();
        let id = dispatcher.subscribe(SignalKind::FrameChanged, obs);
        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        dispatcher.emit(&StoreEvent::FrameChanged { frame: 1 });
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.observer_count(SignalKind::FrameChanged), 0);
    }

    #[test]
    fn observer_may_subscribe_during_emit() {
        let dispatcher = Arc::new(Dispatcher::new());
        let inner = Arc::clone(&dispatcher);
        dispatcher.subscribe(
            SignalKind::FrameChanged,
            Arc::new(move |_| {
                inner.subscribe(SignalKind::ViewChanged, Arc::new(|_| {}));
            }),
        );
        dispatcher.emit(&StoreEvent::FrameChanged { frame: 2 });
        assert_eq!(dispatcher.observer_count(SignalKind::ViewChanged), 1);
    }
}
