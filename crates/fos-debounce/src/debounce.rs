//! Debounced function
//!
//! One instance wraps one callback. It holds at most one pending call:
//! every `invoke` replaces the pending arguments, and the mode decides
//! whether the callback runs now or when the trailing timer fires.

use crate::callback::Callback;
use crate::error::{Ensure, Result};
use crate::host::{TimerHost, TimerId};
use crate::mode::DebounceMode;
use crate::pending::Pending;
use smol::channel::Sender;
use smol::future::BoxedLocal;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Most recent call, waiting to fire
struct Call<A, R> {
    args: A,
    reply: Sender<R>,
}

struct State<A, R> {
    pending: Option<Call<A, R>>,
    timer: Option<TimerId>,
    /// Bumped on every schedule; a timer whose generation is stale is ignored
    generation: u64,
    last_invoked_at: Option<Duration>,
    destroyed: bool,
}

struct Inner<A, R> {
    host: Rc<dyn TimerHost>,
    delay: Duration,
    mode: DebounceMode,
    callback: RefCell<Callback<A, R>>,
    state: RefCell<State<A, R>>,
}

enum Fired<R> {
    Ready(R),
    Deferred(BoxedLocal<R>),
}

/// Debounced wrapper around a [`Callback`].
///
/// Clones share the same instance.
pub struct Debounce<A, R = ()> {
    inner: Rc<Inner<A, R>>,
}

impl<A, R> Clone for Debounce<A, R> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<A, R> fmt::Debug for Debounce<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Debounce")
            .field("delay", &self.inner.delay)
            .field("mode", &self.inner.mode)
            .field("pending", &state.pending.is_some())
            .field("last_invoked_at", &state.last_invoked_at)
            .field("destroyed", &state.destroyed)
            .finish()
    }
}

impl<A: 'static, R: 'static> Debounce<A, R> {
    /// Wrap `callback` with an already validated delay and mode
    pub fn new(host: Rc<dyn TimerHost>, callback: Callback<A, R>, delay: Duration, mode: DebounceMode) -> Self {
        tracing::debug!("Debounce created: {:?} {}", delay, mode);
        Self {
            inner: Rc::new(Inner {
                host,
                delay,
                mode,
                callback: RefCell::new(callback),
                state: RefCell::new(State {
                    pending: None,
                    timer: None,
                    generation: 0,
                    last_invoked_at: None,
                    destroyed: false,
                }),
            }),
        }
    }

    /// Start building from unvalidated parts
    pub fn builder() -> DebounceBuilder<A, R> {
        DebounceBuilder::default()
    }

    /// Record a call.
    ///
    /// Runs the callback right away if the mode's leading edge applies,
    /// otherwise (re)schedules the trailing call. On a destroyed instance
    /// this does nothing and the returned handle is already cancelled.
    pub fn invoke(&self, args: A) -> Pending<R> {
        let inner = &self.inner;
        let (reply, pending) = Pending::channel();

        let (fire_now, superseded) = {
            let mut state = inner.state.borrow_mut();
            if state.destroyed {
                tracing::trace!("Debounce invoked after destroy, ignoring");
                return Pending::cancelled();
            }

            let now = inner.host.now();
            let superseded = state.pending.replace(Call { args, reply });

            let fire_now = match inner.mode {
                DebounceMode::Timeout => {
                    inner.schedule(&mut state, inner.delay);
                    false
                }
                DebounceMode::ImmediateAndTimeout => {
                    if inner.opens_window(&state, now) {
                        true
                    } else {
                        inner.schedule(&mut state, inner.delay);
                        false
                    }
                }
                DebounceMode::MaximumFrequency => {
                    if inner.opens_window(&state, now) {
                        true
                    } else {
                        if state.timer.is_none() {
                            let since_last = state
                                .last_invoked_at
                                .map_or(Duration::ZERO, |last| now.saturating_sub(last));
                            inner.schedule(&mut state, inner.delay.saturating_sub(since_last));
                        }
                        false
                    }
                }
            };
            (fire_now, superseded)
        };
        drop(superseded);

        if fire_now {
            inner.fire();
        }
        pending
    }

    /// Cancel the pending call without running it.
    ///
    /// Also forgets when the callback last ran, so the next call is treated
    /// as the start of a new window.
    pub fn clear(&self) {
        let discarded = self.inner.reset();
        drop(discarded);
    }

    /// Run the pending call now, if there is one
    pub fn flush(&self) {
        self.inner.fire();
    }

    /// Clear and make every later `invoke` a no-op. Idempotent.
    pub fn destroy(&self) {
        let discarded = {
            let discarded = self.inner.reset();
            self.inner.state.borrow_mut().destroyed = true;
            discarded
        };
        drop(discarded);
        tracing::trace!("Debounce destroyed");
    }
}

impl<A, R> Debounce<A, R> {
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    pub fn mode(&self) -> DebounceMode {
        self.inner.mode
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.state.borrow().destroyed
    }

    /// Check if a call is waiting to fire
    pub fn has_pending(&self) -> bool {
        self.inner.state.borrow().pending.is_some()
    }

    /// Host time of the last callback run
    pub fn last_invoked_at(&self) -> Option<Duration> {
        self.inner.state.borrow().last_invoked_at
    }
}

impl<A: 'static, R: 'static> Inner<A, R> {
    /// No timer pending and nothing ran within the last `delay`
    fn opens_window(&self, state: &State<A, R>, now: Duration) -> bool {
        state.timer.is_none()
            && state
                .last_invoked_at
                .is_none_or(|last| now.saturating_sub(last) > self.delay)
    }

    /// Replace the pending timer with one firing after `wait`.
    ///
    /// Cancel and reschedule happen under the same borrow, nothing can run
    /// in between.
    fn schedule(self: &Rc<Self>, state: &mut State<A, R>, wait: Duration) {
        if let Some(id) = state.timer.take() {
            self.host.cancel(id);
        }

        state.generation += 1;
        let generation = state.generation;
        let weak = Rc::downgrade(self);
        let id = self.host.schedule_after(
            wait,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_timer(generation);
                }
            }),
        );
        state.timer = Some(id);
    }

    fn on_timer(self: &Rc<Self>, generation: u64) {
        {
            let mut state = self.state.borrow_mut();
            if state.timer.is_none() || state.generation != generation {
                return;
            }
            state.timer = None;
        }
        self.fire();
    }

    /// Run the callback with the pending call, if any.
    ///
    /// While the callback is already running the call stays pending and
    /// fires from a zero-delay timer once the running callback returns.
    fn fire(self: &Rc<Self>) {
        let Ok(mut callback) = self.callback.try_borrow_mut() else {
            let mut state = self.state.borrow_mut();
            if state.pending.is_some() {
                tracing::debug!("Debounced callback busy, deferring pending call");
                self.schedule(&mut state, Duration::ZERO);
            }
            return;
        };

        let call = {
            let mut state = self.state.borrow_mut();
            if let Some(id) = state.timer.take() {
                self.host.cancel(id);
            }
            let Some(call) = state.pending.take() else {
                return;
            };
            state.last_invoked_at = Some(self.host.now());
            call
        };
        let Call { args, reply } = call;

        let fired = {
            tracing::trace!("Debounce firing");
            match &mut *callback {
                Callback::Sync(f) => Fired::Ready(f(args)),
                Callback::Handler(handler) => Fired::Ready(handler.handle_event(args)),
                Callback::Deferred(f) => Fired::Deferred(f(args)),
            }
        };
        drop(callback);

        match fired {
            Fired::Ready(outcome) => {
                let _ = reply.try_send(outcome);
            }
            Fired::Deferred(future) => {
                self.host.spawn_local(Box::pin(async move {
                    let outcome = future.await;
                    let _ = reply.send(outcome).await;
                }));
            }
        }
    }

    /// Cancel the timer and take the pending call out of the state
    fn reset(&self) -> Option<Call<A, R>> {
        let mut state = self.state.borrow_mut();
        if let Some(id) = state.timer.take() {
            self.host.cancel(id);
        }
        state.last_invoked_at = None;
        state.pending.take()
    }
}

/// Builder for a [`Debounce`] from raw, possibly missing, parts
pub struct DebounceBuilder<A, R = ()> {
    callback: Option<Callback<A, R>>,
    delay_ms: Option<i64>,
    mode: Option<DebounceMode>,
    mode_name: Option<String>,
}

impl<A, R> Default for DebounceBuilder<A, R> {
    fn default() -> Self {
        Self {
            callback: None,
            delay_ms: None,
            mode: None,
            mode_name: None,
        }
    }
}

impl<A: 'static, R: 'static> DebounceBuilder<A, R> {
    pub fn callback(mut self, callback: Callback<A, R>) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn delay_ms(mut self, delay_ms: i64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    pub fn mode(mut self, mode: DebounceMode) -> Self {
        self.mode = Some(mode);
        self.mode_name = None;
        self
    }

    /// Mode by name, validated in `build`
    pub fn mode_name(mut self, name: impl Into<String>) -> Self {
        self.mode_name = Some(name.into());
        self.mode = None;
        self
    }

    /// Validate the parts and create the instance.
    ///
    /// Fails when the callback or delay is missing, the delay is negative,
    /// or the mode name is not recognised.
    pub fn build(self, host: Rc<dyn TimerHost>) -> Result<Debounce<A, R>> {
        let ensure = Ensure::new("Debounce::build");
        let callback = ensure.exists(self.callback, "callback")?;
        let delay_ms = ensure.not_negative(self.delay_ms, "delayMs")?;
        let mode = match self.mode_name {
            Some(name) => ensure.recognized(&name, "mode")?,
            None => self.mode.unwrap_or_default(),
        };

        Ok(Debounce::new(host, callback, Duration::from_millis(delay_ms), mode))
    }
}
