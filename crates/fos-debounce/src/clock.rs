//! Virtual Clock
//!
//! Deterministic timer host. Time only moves when the owner advances it,
//! which makes timing behaviour testable without sleeping.

use crate::host::{TimerHost, TimerId};
use smol::LocalExecutor;
use smol::future::BoxedLocal;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Pending timer
struct Timer {
    id: TimerId,
    due_at: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ClockState {
    /// Pending timers
    timers: Vec<Timer>,
    /// Next timer ID
    next_timer_id: u64,
    /// Current time since the clock's origin
    current_time: Duration,
}

/// Manually advanced timer host
pub struct VirtualClock {
    state: RefCell<ClockState>,
    /// Runs futures handed to `spawn_local`
    executor: LocalExecutor<'static>,
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self {
            state: RefCell::new(ClockState::default()),
            executor: LocalExecutor::new(),
        }
    }
}

impl VirtualClock {
    /// Shared clock starting at zero, ready to hand out as a host
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Advance time by `delta_ms` milliseconds
    pub fn advance_ms(&self, delta_ms: u64) {
        self.advance(Duration::from_millis(delta_ms));
    }

    /// Advance time by `delta`, firing every timer that falls due
    pub fn advance(&self, delta: Duration) {
        let target = self.now() + delta;
        self.advance_to(target);
    }

    /// Advance time to `target`.
    ///
    /// Due timers fire in due-time order with the clock set to their due
    /// time, so callbacks observe accurate timestamps. Timers scheduled by
    /// those callbacks fire too if they fall due before `target`. A target
    /// in the past leaves the clock where it is.
    pub fn advance_to(&self, target: Duration) {
        loop {
            self.run_until_idle();

            let timer = {
                let mut state = self.state.borrow_mut();
                let next = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_at <= target)
                    .min_by_key(|(_, t)| (t.due_at, t.id))
                    .map(|(index, _)| index);

                match next {
                    Some(index) => {
                        let timer = state.timers.remove(index);
                        state.current_time = state.current_time.max(timer.due_at);
                        timer
                    }
                    None => break,
                }
            };

            tracing::trace!("VirtualClock firing timer {} at {:?}", timer.id.as_u64(), timer.due_at);
            (timer.callback)();
        }

        {
            let mut state = self.state.borrow_mut();
            state.current_time = state.current_time.max(target);
        }
        self.run_until_idle();
    }

    /// Poll spawned futures until none can make progress
    pub fn run_until_idle(&self) {
        while self.executor.try_tick() {}
    }

    /// Number of timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Time until the next timer fires
    pub fn time_until_next(&self) -> Option<Duration> {
        let state = self.state.borrow();
        state
            .timers
            .iter()
            .map(|t| t.due_at.saturating_sub(state.current_time))
            .min()
    }

    /// Check if there are pending timers or runnable futures
    pub fn has_pending_work(&self) -> bool {
        self.pending_timers() > 0 || !self.executor.is_empty()
    }
}

impl TimerHost for VirtualClock {
    fn now(&self) -> Duration {
        self.state.borrow().current_time
    }

    fn schedule_after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId::new(state.next_timer_id);
        state.next_timer_id += 1;
        let due_at = state.current_time + delay;
        state.timers.push(Timer { id, due_at, callback });
        id
    }

    fn cancel(&self, id: TimerId) {
        let removed = {
            let mut state = self.state.borrow_mut();
            state
                .timers
                .iter()
                .position(|t| t.id == id)
                .map(|index| state.timers.remove(index))
        };
        drop(removed);
    }

    fn spawn_local(&self, future: BoxedLocal<()>) {
        self.executor.spawn(future).detach();
    }
}
