//! Subscribers and the values they are registered from.
//!
//! A [`Subscriber`] is the uniform call interface the dispatcher invokes: it
//! receives the positional argument list of a dispatch and answers a
//! [`Response`]. Any `Fn(&[A]) -> R` closure or function pointer whose `R`
//! implements [`IntoResponse`] is a subscriber.
//!
//! A [`Callable`] is what callers hand to `subscribe`. It is either an
//! invocable value or the name of a function defined on the dispatcher;
//! names are resolved once, at registration.

use crate::{
    error::{BoxError, SubscriberNotCallable},
    response::{IntoResponse, Response},
};
use std::{fmt, sync::Arc};

/// A value the dispatcher can invoke with a positional argument list.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a subscriber taking `&[{A}]` and answering `{T}`",
    label = "missing `Subscriber` implementation",
    note = "Closures of shape `Fn(&[{A}]) -> R` where `R: IntoResponse<{T}>` are subscribers."
)]
pub trait Subscriber<A, T>: Send + Sync + 'static {
    /// Invoke the subscriber with the dispatch arguments.
    fn invoke(&self, args: &[A]) -> Result<Response<T>, BoxError>;
}

impl<A, T, F, R> Subscriber<A, T> for F
where
    F: Fn(&[A]) -> R + Send + Sync + 'static,
    R: IntoResponse<T>,
{
    fn invoke(&self, args: &[A]) -> Result<Response<T>, BoxError> {
        (self)(args).into_response()
    }
}

/// A shared, type-erased subscriber.
pub type SharedSubscriber<A, T> = Arc<dyn Subscriber<A, T>>;

/// Something that may be registered as a subscriber.
pub enum Callable<A, T> {
    /// An invocable value.
    Func(SharedSubscriber<A, T>),
    /// The name of a function defined on the dispatcher.
    Named(String),
}

impl<A, T> Callable<A, T> {
    /// Wrap a closure or function pointer.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoResponse<T>,
    {
        Callable::Func(Arc::new(f))
    }

    /// Wrap any [`Subscriber`] implementation.
    pub fn from_subscriber<S>(subscriber: S) -> Self
    where
        S: Subscriber<A, T>,
    {
        Callable::Func(Arc::new(subscriber))
    }

    /// Refer to a named function.
    pub fn named(name: impl Into<String>) -> Self {
        Callable::Named(name.into())
    }

    /// Resolve to an invocable subscriber.
    ///
    /// `lookup` maps function names to subscribers; a name it does not know
    /// yields [`SubscriberNotCallable`].
    pub fn resolve<L>(self, lookup: L) -> Result<SharedSubscriber<A, T>, SubscriberNotCallable>
    where
        L: FnOnce(&str) -> Option<SharedSubscriber<A, T>>,
    {
        match self {
            Callable::Func(subscriber) => Ok(subscriber),
            Callable::Named(name) => lookup(&name).ok_or(SubscriberNotCallable { name }),
        }
    }
}

impl<A, T> Clone for Callable<A, T> {
    fn clone(&self) -> Self {
        match self {
            Callable::Func(subscriber) => Callable::Func(subscriber.clone()),
            Callable::Named(name) => Callable::Named(name.clone()),
        }
    }
}

impl<A, T> fmt::Debug for Callable<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Func(_) => f.write_str("Callable::Func(..)"),
            Callable::Named(name) => f.debug_tuple("Callable::Named").field(name).finish(),
        }
    }
}

impl<A, T> From<&str> for Callable<A, T> {
    fn from(name: &str) -> Self {
        Callable::Named(name.to_owned())
    }
}

impl<A, T> From<String> for Callable<A, T> {
    fn from(name: String) -> Self {
        Callable::Named(name)
    }
}

impl<A, T> From<SharedSubscriber<A, T>> for Callable<A, T> {
    fn from(subscriber: SharedSubscriber<A, T>) -> Self {
        Callable::Func(subscriber)
    }
}
