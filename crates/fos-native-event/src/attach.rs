//! Native event attachment
//!
//! Registers a listener (optionally behind a debounced proxy) on a target
//! and records a teardown handle in a side-table, so the attachment can be
//! found and removed later without touching the target itself.

use crate::config::NativeEventConfig;
use crate::event::{Event, EventListener, ListenerOptions};
use crate::target::{EventTarget, TargetId};
use fos_debounce::{Debounce, DebounceMode, Ensure, Result, TimerHost};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Side-table key: target identity plus prefixed event name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AttachmentKey {
    target: TargetId,
    prop: String,
}

type AttachmentTable = RefCell<HashMap<AttachmentKey, NativeEvent>>;

/// Everything teardown needs to undo one attachment
struct Attachment {
    key: AttachmentKey,
    target: Weak<dyn EventTarget>,
    event_type: String,
    /// Exact listener registered on the target
    listener: EventListener,
    options: ListenerOptions,
    debounce: Option<Debounce<Event>>,
    table: Weak<AttachmentTable>,
    destroyed: Cell<bool>,
}

/// Teardown handle for one attachment
#[derive(Clone)]
pub struct NativeEvent {
    inner: Rc<Attachment>,
}

impl NativeEvent {
    /// Detach the listener, destroy its debouncer and free the slot.
    ///
    /// Removal uses the same listener and options as registration. Safe to
    /// call more than once.
    pub fn destroy(&self) {
        let attachment = &self.inner;
        if attachment.destroyed.replace(true) {
            return;
        }

        if let Some(debounce) = &attachment.debounce {
            debounce.destroy();
        }

        if let Some(target) = attachment.target.upgrade() {
            target.remove_event_listener(&attachment.event_type, &attachment.listener, attachment.options);
        }

        if let Some(table) = attachment.table.upgrade() {
            let removed = {
                let mut table = table.borrow_mut();
                let owns_slot = table
                    .get(&attachment.key)
                    .is_some_and(|current| Rc::ptr_eq(&current.inner, &self.inner));
                if owns_slot { table.remove(&attachment.key) } else { None }
            };
            drop(removed);
        }

        tracing::debug!(
            "native-event | event listener removed: {} on target {}",
            attachment.event_type,
            attachment.key.target.as_u64()
        );
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    pub fn event_type(&self) -> &str {
        &self.inner.event_type
    }

    pub fn target_id(&self) -> TargetId {
        self.inner.key.target
    }

    pub fn options(&self) -> ListenerOptions {
        self.inner.options
    }

    /// The listener registered on the target (the debounced proxy, if any)
    pub fn listener(&self) -> &EventListener {
        &self.inner.listener
    }

    pub fn debounce(&self) -> Option<&Debounce<Event>> {
        self.inner.debounce.as_ref()
    }
}

impl fmt::Debug for NativeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEvent")
            .field("target", &self.inner.key.target)
            .field("event_type", &self.inner.event_type)
            .field("options", &self.inner.options)
            .field("debounce", &self.inner.debounce)
            .field("destroyed", &self.inner.destroyed.get())
            .finish()
    }
}

/// Arguments of [`NativeEvents::attach`].
///
/// Target, event and listener are required; `attach` rejects a request
/// that lacks any of them.
#[derive(Default)]
pub struct AttachRequest {
    target: Option<Rc<dyn EventTarget>>,
    event_type: Option<String>,
    listener: Option<EventListener>,
    options: ListenerOptions,
    debounce_ms: Option<i64>,
    debounce_mode: Option<DebounceMode>,
    debounce_mode_name: Option<String>,
    replace_existing: bool,
}

impl AttachRequest {
    pub fn new<T: EventTarget + 'static>(target: &Rc<T>, event_type: &str, listener: EventListener) -> Self {
        Self::default().target(target).event(event_type).listener(listener)
    }

    pub fn target<T: EventTarget + 'static>(mut self, target: &Rc<T>) -> Self {
        let target: Rc<dyn EventTarget> = target.clone();
        self.target = Some(target);
        self
    }

    pub fn event(mut self, event_type: &str) -> Self {
        self.event_type = Some(event_type.to_string());
        self
    }

    pub fn listener(mut self, listener: EventListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn options(mut self, options: impl Into<ListenerOptions>) -> Self {
        self.options = options.into();
        self
    }

    /// Route the listener through a debouncer with this delay
    pub fn debounce_ms(mut self, debounce_ms: i64) -> Self {
        self.debounce_ms = Some(debounce_ms);
        self
    }

    pub fn debounce_mode(mut self, mode: DebounceMode) -> Self {
        self.debounce_mode = Some(mode);
        self.debounce_mode_name = None;
        self
    }

    /// Debounce mode by name, validated in `attach`
    pub fn debounce_mode_name(mut self, name: &str) -> Self {
        self.debounce_mode_name = Some(name.to_string());
        self.debounce_mode = None;
        self
    }

    /// Tear down an existing attachment for the same target and event
    /// instead of keeping it
    pub fn replace_existing(mut self, replace: bool) -> Self {
        self.replace_existing = replace;
        self
    }
}

/// Attaches native listeners and owns the attachment side-table.
///
/// Clones share the same table.
#[derive(Clone)]
pub struct NativeEvents {
    config: Rc<NativeEventConfig>,
    host: Rc<dyn TimerHost>,
    table: Rc<AttachmentTable>,
}

impl NativeEvents {
    pub fn new(config: NativeEventConfig, host: Rc<dyn TimerHost>) -> Self {
        tracing::debug!("native-event | configured: {:?}", config);
        Self {
            config: Rc::new(config),
            host,
            table: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &NativeEventConfig {
        &self.config
    }

    /// Attach a listener.
    ///
    /// Returns `None` without registering anything when the target already
    /// has an attachment for this event and replacement was not requested.
    pub fn attach(&self, request: AttachRequest) -> Result<Option<NativeEvent>> {
        let ensure = Ensure::new("attach");
        let target = ensure.exists(request.target, "target")?;
        let event_type = ensure.not_empty(request.event_type.as_deref(), "event")?.to_string();
        let listener = ensure.exists(request.listener, "listener")?;
        let debounce_ms = request
            .debounce_ms
            .map(|ms| ensure.not_negative(Some(ms), "debounceMs"))
            .transpose()?;
        let mode = match request.debounce_mode_name {
            Some(name) => ensure.recognized(&name, "debounceMode")?,
            None => request.debounce_mode.unwrap_or(self.config.default_debounce_mode),
        };

        let key = AttachmentKey {
            target: target.target_id(),
            prop: self.config.prop_key(&event_type),
        };

        self.prune();

        let existing = self.table.borrow().get(&key).cloned();
        if let Some(existing) = existing {
            if !request.replace_existing {
                tracing::debug!("native-event | {} already attached, skipping", key.prop);
                return Ok(None);
            }
            tracing::debug!("native-event | replacing existing listener: {}", key.prop);
            existing.destroy();
        }

        let (listener, debounce) = match debounce_ms {
            Some(ms) => {
                let debounce = Debounce::new(
                    self.host.clone(),
                    listener.into_callback(),
                    Duration::from_millis(ms),
                    mode,
                );
                let proxy = debounce.clone();
                let listener = EventListener::function(move |event| {
                    proxy.invoke(event);
                });
                tracing::debug!("native-event | event listener debounced: {}ms {}", ms, mode);
                (listener, Some(debounce))
            }
            None => (listener, None),
        };

        target.add_event_listener(&event_type, listener.clone(), request.options);

        let handle = NativeEvent {
            inner: Rc::new(Attachment {
                key: key.clone(),
                target: Rc::downgrade(&target),
                event_type,
                listener,
                options: request.options,
                debounce,
                table: Rc::downgrade(&self.table),
                destroyed: Cell::new(false),
            }),
        };
        self.table.borrow_mut().insert(key, handle.clone());

        tracing::debug!(
            "native-event | event listener added: {} on target {}",
            handle.event_type(),
            handle.target_id().as_u64()
        );
        Ok(Some(handle))
    }

    /// Current attachment for a target and event
    pub fn find<T: EventTarget + ?Sized>(&self, target: &T, event_type: &str) -> Option<NativeEvent> {
        let key = AttachmentKey {
            target: target.target_id(),
            prop: self.config.prop_key(event_type),
        };
        self.table.borrow().get(&key).cloned()
    }

    /// Tear down the attachment for a target and event, if any
    pub fn detach<T: EventTarget + ?Sized>(&self, target: &T, event_type: &str) -> bool {
        match self.find(target, event_type) {
            Some(handle) => {
                handle.destroy();
                true
            }
            None => false,
        }
    }

    /// Number of live attachments
    pub fn len(&self) -> usize {
        self.prune();
        self.table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.prune();
        self.table.borrow().is_empty()
    }

    /// Tear down attachments whose target no longer exists.
    /// Returns how many were removed.
    ///
    /// Runs on every `attach`, `len` and `is_empty`, so the table never
    /// outgrows the live targets by more than those dropped since.
    pub fn prune(&self) -> usize {
        let orphaned: Vec<NativeEvent> = self
            .table
            .borrow()
            .values()
            .filter(|handle| handle.inner.target.strong_count() == 0)
            .cloned()
            .collect();

        for handle in &orphaned {
            handle.destroy();
        }
        orphaned.len()
    }

    /// Tear down every attachment
    pub fn destroy_all(&self) {
        let handles: Vec<NativeEvent> = self.table.borrow().values().cloned().collect();
        for handle in handles {
            handle.destroy();
        }
    }
}

impl fmt::Debug for NativeEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEvents")
            .field("config", &self.config)
            .field("attachments", &self.table.borrow().len())
            .finish()
    }
}
