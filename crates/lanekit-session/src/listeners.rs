//! Subscriber registry for session events.
//!
//! Each event kind maps to an ordered set of callbacks. Dispatch always
//! iterates a snapshot of that set, so a callback may unsubscribe itself
//! (or any other subscriber) while an event is being delivered without
//! invalidating the iteration.

use lanekit_core::{DeviceEvent, EventKind};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Callback invoked with an owned copy of each delivered event.
pub type EventCallback = Arc<dyn Fn(DeviceEvent) + Send + Sync>;

/// Token identifying one subscription, returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Subscriber {
    id: SubscriptionId,
    callback: EventCallback,
}

/// Ordered subscriber lists, one per event kind.
pub struct ListenerRegistry {
    data: Vec<Subscriber>,
    status: Vec<Subscriber>,
    error: Vec<Subscriber>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            status: Vec::new(),
            error: Vec::new(),
        }
    }

    fn list(&self, kind: EventKind) -> &Vec<Subscriber> {
        match kind {
            EventKind::Data => &self.data,
            EventKind::Status => &self.status,
            EventKind::Error => &self.error,
        }
    }

    fn list_mut(&mut self, kind: EventKind) -> &mut Vec<Subscriber> {
        match kind {
            EventKind::Data => &mut self.data,
            EventKind::Status => &mut self.status,
            EventKind::Error => &mut self.error,
        }
    }

    /// Register a callback for one event kind.
    pub fn subscribe(&mut self, kind: EventKind, callback: EventCallback) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.list_mut(kind).push(Subscriber { id, callback });
        id
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for kind in [EventKind::Data, EventKind::Status, EventKind::Error] {
            let list = self.list_mut(kind);
            if let Some(pos) = list.iter().position(|s| s.id == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Snapshot of the callbacks for one kind, in subscription order.
    pub fn snapshot(&self, kind: EventKind) -> Vec<EventCallback> {
        self.list(kind)
            .iter()
            .map(|s| Arc::clone(&s.callback))
            .collect()
    }

    /// Number of subscribers for one kind.
    pub fn len(&self, kind: EventKind) -> usize {
        self.list(kind).len()
    }

    /// Whether the registry has no subscribers at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.status.is_empty() && self.error.is_empty()
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("data", &self.data.len())
            .field("status", &self.status.len())
            .field("error", &self.error.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanekit_core::{ScanData, StatusCode};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn data_event() -> DeviceEvent {
        DeviceEvent::Data(ScanData::new(vec![0x41], vec![0x41], 0))
    }

    #[test]
    fn test_subscribe_and_dispatch_order() {
        let mut registry = ListenerRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            registry.subscribe(
                EventKind::Data,
                Arc::new(move |_| order.lock().unwrap().push(tag)),
            );
        }

        for callback in registry.snapshot(EventKind::Data) {
            callback(data_event());
        }

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_cb = Arc::clone(&calls);
        let id = registry.subscribe(
            EventKind::Status,
            Arc::new(move |_| {
                calls_cb.fetch_add(1, Ordering::Relaxed);
            }),
        );

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));

        for callback in registry.snapshot(EventKind::Status) {
            callback(DeviceEvent::Status(StatusCode::PowerOnline));
        }
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_snapshot_survives_unsubscribe_during_dispatch() {
        let mut registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_a = Arc::clone(&calls);
        let a = registry.subscribe(
            EventKind::Data,
            Arc::new(move |_| {
                calls_a.fetch_add(1, Ordering::Relaxed);
            }),
        );
        let calls_b = Arc::clone(&calls);
        registry.subscribe(
            EventKind::Data,
            Arc::new(move |_| {
                calls_b.fetch_add(1, Ordering::Relaxed);
            }),
        );

        // Take a snapshot, then mutate the registry mid-dispatch the way a
        // callback would.
        let snapshot = registry.snapshot(EventKind::Data);
        registry.unsubscribe(a);
        for callback in snapshot {
            callback(data_event());
        }

        assert_eq!(calls.load(Ordering::Relaxed), 2);
        assert_eq!(registry.len(EventKind::Data), 1);
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut registry = ListenerRegistry::new();
        registry.subscribe(EventKind::Data, Arc::new(|_| {}));
        registry.subscribe(EventKind::Error, Arc::new(|_| {}));

        assert_eq!(registry.len(EventKind::Data), 1);
        assert_eq!(registry.len(EventKind::Status), 0);
        assert_eq!(registry.len(EventKind::Error), 1);
        assert!(!registry.is_empty());
    }
}
