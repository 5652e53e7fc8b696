//! fOS Native Event
//!
//! Attaches native event listeners to event targets, optionally through a
//! debounced proxy, and tears them down again when the owning element's
//! lifecycle ends.
//!
//! At most one attachment exists per (target, event name). Attachments are
//! tracked in a side-table owned by [`NativeEvents`], keyed by target
//! identity and the configured property prefix plus event name.

mod attach;
mod binding;
mod config;
mod event;
pub mod logging;
mod target;

pub use attach::{AttachRequest, NativeEvent, NativeEvents};
pub use binding::{EventBinding, NativeEventOptions};
pub use config::{LogLevel, NativeEventConfig, DEFAULT_DIRECTIVE_NAME, DEFAULT_PROP_NAME_PREFIX};
pub use event::{Event, EventListener, ListenerOptions};
pub use target::{Element, EventTarget, TargetId};

pub use fos_debounce::{
    Callback, DebounceMode, Error, HandleEvent, LocalTimers, Result, TimerHost, VirtualClock,
};
