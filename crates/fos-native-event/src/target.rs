//! Event targets

use crate::event::{Event, EventListener, ListenerOptions};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of an event target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(u64);

impl TargetId {
    /// Allocate a fresh, process-unique id
    pub fn next() -> Self {
        TargetId(NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Anything native listeners can be added to and removed from
pub trait EventTarget {
    fn target_id(&self) -> TargetId;

    fn add_event_listener(&self, event_type: &str, listener: EventListener, options: ListenerOptions);

    /// Remove a listener. Matches by listener identity and `capture`.
    fn remove_event_listener(&self, event_type: &str, listener: &EventListener, options: ListenerOptions);
}

/// Listener registration
#[derive(Debug, Clone)]
struct Registration {
    listener: EventListener,
    options: ListenerOptions,
}

impl Registration {
    fn matches(&self, listener: &EventListener, options: ListenerOptions) -> bool {
        self.listener.ptr_eq(listener) && self.options.capture == options.capture
    }
}

/// In-memory element with its own listener registry
#[derive(Debug)]
pub struct Element {
    id: TargetId,
    tag: String,
    /// Event type -> registrations in insertion order
    listeners: RefCell<HashMap<String, Vec<Registration>>>,
}

impl Element {
    pub fn new(tag: &str) -> Rc<Self> {
        Rc::new(Self {
            id: TargetId::next(),
            tag: tag.to_string(),
            listeners: RefCell::new(HashMap::new()),
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Deliver `event` to every listener for its type.
    ///
    /// Listeners run in registration order against a snapshot, so they may
    /// add or remove listeners freely. `once` registrations are removed
    /// before they run. Returns the number of listeners run.
    pub fn dispatch_event(&self, mut event: Event) -> usize {
        event.target = Some(self.id);

        let snapshot: Vec<Registration> = {
            let mut listeners = self.listeners.borrow_mut();
            let Some(registrations) = listeners.get_mut(&event.event_type) else {
                return 0;
            };
            let snapshot = registrations.clone();
            registrations.retain(|r| !r.options.once);
            snapshot
        };

        for registration in &snapshot {
            registration.listener.call(event.clone());
        }
        snapshot.len()
    }

    /// Number of listeners for an event type
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .borrow()
            .get(event_type)
            .map_or(0, |registrations| registrations.len())
    }

    /// Check if this exact listener is registered for an event type
    pub fn has_listener(&self, event_type: &str, listener: &EventListener) -> bool {
        self.listeners
            .borrow()
            .get(event_type)
            .is_some_and(|registrations| registrations.iter().any(|r| r.listener.ptr_eq(listener)))
    }

    /// Remove every listener
    pub fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl EventTarget for Element {
    fn target_id(&self) -> TargetId {
        self.id
    }

    fn add_event_listener(&self, event_type: &str, listener: EventListener, options: ListenerOptions) {
        let mut listeners = self.listeners.borrow_mut();
        let registrations = listeners.entry(event_type.to_string()).or_default();

        // Same listener with the same capture flag is registered only once
        if registrations.iter().any(|r| r.matches(&listener, options)) {
            return;
        }
        registrations.push(Registration { listener, options });
    }

    fn remove_event_listener(&self, event_type: &str, listener: &EventListener, options: ListenerOptions) {
        let removed = {
            let mut listeners = self.listeners.borrow_mut();
            let Some(registrations) = listeners.get_mut(event_type) else {
                return;
            };
            let removed = registrations
                .iter()
                .position(|r| r.matches(listener, options))
                .map(|index| registrations.remove(index));
            if registrations.is_empty() {
                listeners.remove(event_type);
            }
            removed
        };
        drop(removed);
    }
}
