//! Real-time timer host on a smol local executor

use crate::host::{TimerHost, TimerId};
use smol::future::BoxedLocal;
use smol::{LocalExecutor, Task, Timer};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Timer host backed by `smol::Timer`.
///
/// Timers only make progress while the executor is driven, i.e. inside
/// [`LocalTimers::block_on`].
pub struct LocalTimers {
    executor: LocalExecutor<'static>,
    /// Scheduled timers; dropping a task cancels it
    timers: Rc<RefCell<HashMap<TimerId, Task<()>>>>,
    next_timer_id: Cell<u64>,
    origin: Instant,
}

impl Default for LocalTimers {
    fn default() -> Self {
        Self {
            executor: LocalExecutor::new(),
            timers: Rc::new(RefCell::new(HashMap::new())),
            next_timer_id: Cell::new(0),
            origin: Instant::now(),
        }
    }
}

impl LocalTimers {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Drive timers and spawned futures until `future` completes
    pub fn block_on<T>(&self, future: impl Future<Output = T>) -> T {
        smol::block_on(self.executor.run(future))
    }

    /// Number of timers that have not fired yet
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }
}

impl TimerHost for LocalTimers {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn schedule_after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId::new(self.next_timer_id.get());
        self.next_timer_id.set(id.as_u64() + 1);

        let timers = Rc::downgrade(&self.timers);
        let task = self.executor.spawn(async move {
            Timer::after(delay).await;
            // Drop our own entry first, the callback may cancel by id.
            if let Some(timers) = timers.upgrade() {
                let handle = timers.borrow_mut().remove(&id);
                if let Some(handle) = handle {
                    handle.detach();
                }
            }
            callback();
        });

        self.timers.borrow_mut().insert(id, task);
        id
    }

    fn cancel(&self, id: TimerId) {
        let task = self.timers.borrow_mut().remove(&id);
        drop(task);
    }

    fn spawn_local(&self, future: BoxedLocal<()>) {
        self.executor.spawn(future).detach();
    }
}
