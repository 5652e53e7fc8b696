//! Timer host abstraction
//!
//! The single-threaded loop a debounced function schedules its trailing
//! calls on.

use smol::future::BoxedLocal;
use std::time::Duration;

/// Timer identifier handed out by a [`TimerHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn new(id: u64) -> Self {
        TimerId(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Delayed callbacks on a cooperative, single-threaded loop.
///
/// Callbacks never run re-entrantly from inside `schedule_after` or
/// `cancel`; they run on a later turn of the loop.
pub trait TimerHost {
    /// Monotonic time since the host's origin
    fn now(&self) -> Duration;

    /// Run `callback` once `delay` has elapsed
    fn schedule_after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a scheduled callback. Unknown or already fired ids are ignored.
    fn cancel(&self, id: TimerId);

    /// Drive a future on the same loop
    fn spawn_local(&self, future: BoxedLocal<()>);
}
