//! Debounced callback forms

use smol::future::BoxedLocal;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Listener-object form of a callback.
///
/// Debounced calls are routed through `handle_event` rather than treating
/// the object as a function.
pub trait HandleEvent<A, R = ()> {
    fn handle_event(&self, args: A) -> R;
}

/// The function a [`Debounce`](crate::Debounce) eventually calls
pub enum Callback<A, R = ()> {
    /// Runs to completion and returns its outcome directly
    Sync(Box<dyn FnMut(A) -> R>),
    /// Returns a future; the outcome is delivered once it completes
    Deferred(Box<dyn FnMut(A) -> BoxedLocal<R>>),
    /// Listener object
    Handler(Rc<dyn HandleEvent<A, R>>),
}

impl<A, R> Callback<A, R> {
    pub fn sync(f: impl FnMut(A) -> R + 'static) -> Self {
        Callback::Sync(Box::new(f))
    }

    pub fn deferred<F, Fut>(mut f: F) -> Self
    where
        F: FnMut(A) -> Fut + 'static,
        Fut: Future<Output = R> + 'static,
    {
        Callback::Deferred(Box::new(move |args| Box::pin(f(args))))
    }

    pub fn handler(handler: Rc<dyn HandleEvent<A, R>>) -> Self {
        Callback::Handler(handler)
    }
}

impl<A, R> fmt::Debug for Callback<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Callback::Sync(_) => "Sync",
            Callback::Deferred(_) => "Deferred",
            Callback::Handler(_) => "Handler",
        };
        f.debug_tuple("Callback").field(&kind).finish()
    }
}
