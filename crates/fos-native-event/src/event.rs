//! Events and listeners

use crate::target::TargetId;
use fos_debounce::{Callback, HandleEvent};
use std::fmt;
use std::rc::Rc;

/// Native event as delivered to listeners
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: String,
    /// Target the event was dispatched on
    pub target: Option<TargetId>,
    /// Milliseconds since the dispatching host's origin
    pub timestamp: f64,
    /// Free-form payload (input value, key name, ...)
    pub detail: Option<String>,
}

impl Event {
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: None,
            timestamp: 0.0,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Registration options, forwarded opaquely to the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ListenerOptions {
    pub capture: bool,
    pub once: bool,
    pub passive: bool,
}

impl ListenerOptions {
    pub fn capture() -> Self {
        Self { capture: true, ..Self::default() }
    }

    pub fn once() -> Self {
        Self { once: true, ..Self::default() }
    }

    pub fn passive() -> Self {
        Self { passive: true, ..Self::default() }
    }
}

/// Bare boolean form means `capture`
impl From<bool> for ListenerOptions {
    fn from(capture: bool) -> Self {
        Self { capture, ..Self::default() }
    }
}

/// Listener registered on a target.
///
/// Cloning keeps identity; removal from a target matches by identity.
#[derive(Clone)]
pub enum EventListener {
    Function(Rc<dyn Fn(Event)>),
    Object(Rc<dyn HandleEvent<Event>>),
}

impl EventListener {
    pub fn function(f: impl Fn(Event) + 'static) -> Self {
        EventListener::Function(Rc::new(f))
    }

    pub fn object(handler: Rc<dyn HandleEvent<Event>>) -> Self {
        EventListener::Object(handler)
    }

    /// Deliver an event
    pub fn call(&self, event: Event) {
        match self {
            EventListener::Function(f) => f(event),
            EventListener::Object(handler) => handler.handle_event(event),
        }
    }

    /// Same underlying listener
    pub fn ptr_eq(&self, other: &EventListener) -> bool {
        self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        match self {
            EventListener::Function(f) => Rc::as_ptr(f) as *const (),
            EventListener::Object(handler) => Rc::as_ptr(handler) as *const (),
        }
    }

    /// Debounce callback that keeps the listener's form
    pub(crate) fn into_callback(self) -> Callback<Event> {
        match self {
            EventListener::Function(f) => Callback::sync(move |event| f(event)),
            EventListener::Object(handler) => Callback::Handler(handler),
        }
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            EventListener::Function(_) => "Function",
            EventListener::Object(_) => "Object",
        };
        f.debug_tuple(kind).field(&self.addr()).finish()
    }
}
