//! fOS Debounce
//!
//! Coalesces rapid repeated calls into fewer callback invocations.
//!
//! A [`Debounce`] wraps one callback and one delay. Calls go through
//! [`Debounce::invoke`]; when the callback actually runs is decided by the
//! [`DebounceMode`]. Timers come from a [`TimerHost`]: [`VirtualClock`] for
//! deterministic stepping, [`LocalTimers`] for real time on a smol executor.
//!
//! Everything here is single-threaded. Handles are `Rc`-based and never
//! cross threads.

mod callback;
mod clock;
mod debounce;
mod error;
mod host;
mod local;
mod mode;
mod pending;

pub use callback::{Callback, HandleEvent};
pub use clock::VirtualClock;
pub use debounce::{Debounce, DebounceBuilder};
pub use error::{Cancelled, Ensure, Error, Result};
pub use host::{TimerHost, TimerId};
pub use local::LocalTimers;
pub use mode::DebounceMode;
pub use pending::Pending;
