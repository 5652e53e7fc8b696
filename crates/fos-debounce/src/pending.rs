//! Outcome of a single debounced call

use crate::error::Cancelled;
use smol::channel::{self, Receiver, Sender};
use std::cell::Cell;

/// Handle to the eventual outcome of one [`Debounce::invoke`](crate::Debounce::invoke).
///
/// Only the call whose arguments actually reach the callback gets an
/// outcome. Calls that were superseded, cleared or destroyed never do; their
/// handle reports cancellation instead of waiting forever.
#[derive(Debug)]
pub struct Pending<R> {
    rx: Receiver<R>,
    taken: Cell<bool>,
}

impl<R> Pending<R> {
    pub(crate) fn channel() -> (Sender<R>, Self) {
        let (tx, rx) = channel::bounded(1);
        (tx, Self { rx, taken: Cell::new(false) })
    }

    /// A handle that is cancelled from the start
    pub(crate) fn cancelled() -> Self {
        let (_, pending) = Self::channel();
        pending
    }

    /// Take the outcome if the call has fired
    pub fn try_outcome(&self) -> Option<R> {
        let outcome = self.rx.try_recv().ok();
        if outcome.is_some() {
            self.taken.set(true);
        }
        outcome
    }

    /// True once it is certain no outcome will ever arrive
    pub fn is_cancelled(&self) -> bool {
        !self.taken.get() && self.rx.is_closed() && self.rx.is_empty()
    }

    /// Wait for the outcome
    pub async fn outcome(self) -> Result<R, Cancelled> {
        self.rx.recv().await.map_err(|_| Cancelled)
    }
}
