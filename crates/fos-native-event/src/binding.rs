//! Lifecycle binding
//!
//! Drives attachments from an element's mount, update and unmount hooks.

use crate::attach::{AttachRequest, NativeEvent, NativeEvents};
use crate::event::{EventListener, ListenerOptions};
use crate::target::EventTarget;
use fos_debounce::{DebounceMode, Result};
use std::rc::Rc;

/// Value bound to an element
#[derive(Debug, Clone)]
pub struct NativeEventOptions {
    pub event: String,
    pub listener: EventListener,
    pub options: ListenerOptions,
    pub debounce_ms: Option<i64>,
    pub debounce_mode: Option<DebounceMode>,
    /// Keep the listener detached
    pub disabled: bool,
}

impl NativeEventOptions {
    pub fn new(event: &str, listener: EventListener) -> Self {
        Self {
            event: event.to_string(),
            listener,
            options: ListenerOptions::default(),
            debounce_ms: None,
            debounce_mode: None,
            disabled: false,
        }
    }

    pub fn with_options(mut self, options: impl Into<ListenerOptions>) -> Self {
        self.options = options.into();
        self
    }

    pub fn with_debounce(mut self, debounce_ms: i64) -> Self {
        self.debounce_ms = Some(debounce_ms);
        self
    }

    pub fn with_debounce_mode(mut self, mode: DebounceMode) -> Self {
        self.debounce_mode = Some(mode);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Same attachment settings: event, listener identity, options and
    /// debounce. `disabled` is not compared.
    fn same_attachment(&self, other: &NativeEventOptions) -> bool {
        self.event == other.event
            && self.listener.ptr_eq(&other.listener)
            && self.options == other.options
            && self.debounce_ms == other.debounce_ms
            && self.debounce_mode == other.debounce_mode
    }

    fn to_request<T: EventTarget + 'static>(&self, target: &Rc<T>) -> AttachRequest {
        let mut request = AttachRequest::new(target, &self.event, self.listener.clone())
            .options(self.options)
            .replace_existing(true);
        if let Some(ms) = self.debounce_ms {
            request = request.debounce_ms(ms);
        }
        if let Some(mode) = self.debounce_mode {
            request = request.debounce_mode(mode);
        }
        request
    }
}

/// Lifecycle hooks around [`NativeEvents`]
#[derive(Debug, Clone)]
pub struct EventBinding {
    events: NativeEvents,
}

impl EventBinding {
    pub fn new(events: NativeEvents) -> Self {
        Self { events }
    }

    /// Configured directive name
    pub fn name(&self) -> &str {
        &self.events.config().directive_name
    }

    pub fn events(&self) -> &NativeEvents {
        &self.events
    }

    pub fn before_mount<T: EventTarget + 'static>(
        &self,
        target: &Rc<T>,
        value: &NativeEventOptions,
    ) -> Result<Option<NativeEvent>> {
        if value.disabled {
            return Ok(None);
        }
        self.events.attach(value.to_request(target))
    }

    /// Re-apply the bound value.
    ///
    /// An enabled value whose attachment settings match `old_value` keeps
    /// the current attachment, including any call its debouncer holds.
    /// Any other change re-attaches with replacement, which discards that
    /// pending call.
    pub fn updated<T: EventTarget + 'static>(
        &self,
        target: &Rc<T>,
        value: &NativeEventOptions,
        old_value: Option<&NativeEventOptions>,
    ) -> Result<Option<NativeEvent>> {
        if let Some(old) = old_value {
            if !value.disabled && !old.disabled && value.same_attachment(old) {
                if let Some(current) = self.events.find(&**target, &value.event) {
                    return Ok(Some(current));
                }
            }
        }

        if let Some(old) = old_value.filter(|old| old.event != value.event) {
            self.events.detach(&**target, &old.event);
        }

        if value.disabled {
            self.events.detach(&**target, &value.event);
            return Ok(None);
        }
        self.events.attach(value.to_request(target))
    }

    pub fn before_unmount<T: EventTarget + 'static>(&self, target: &Rc<T>, value: &NativeEventOptions) {
        self.events.detach(&**target, &value.event);
    }
}
