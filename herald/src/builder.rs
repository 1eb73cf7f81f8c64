//! Dispatcher configuration.

use crate::{dispatcher::Dispatcher, registry::DEFAULT_PRIORITY};
use herald_core::{IntoResponse, SharedSubscriber, Subscriber};
use std::{collections::HashMap, sync::Arc};

/// Builder for constructing a [`Dispatcher`].
///
/// # Example
/// ```
/// use herald::{Dispatcher, Payload};
///
/// let dispatcher = Dispatcher::<String, String>::builder()
///     .function("shout", |args: &[String]| Some(args[0].to_uppercase()))
///     .default_priority(10)
///     .build();
///
/// dispatcher.subscribe("greet", "shout", 0).unwrap();
/// let out = dispatcher.dispatch("greet", Payload::Single("hi".into())).unwrap();
/// assert_eq!(out, vec![Some("HI".to_string())]);
/// ```
pub struct DispatcherBuilder<A, T> {
    functions: HashMap<String, SharedSubscriber<A, T>>,
    default_priority: i32,
}

impl<A, T> DispatcherBuilder<A, T>
where
    A: Send + Sync + 'static,
    T: 'static,
{
    /// Create a new builder with no named functions and priority `0`.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            default_priority: DEFAULT_PRIORITY,
        }
    }

    /// Define a named function, resolvable by `subscribe` through its name.
    pub fn function<F, R>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoResponse<T>,
    {
        self.function_subscriber(name, f)
    }

    /// Define a named function from any [`Subscriber`] implementation.
    pub fn function_subscriber<S>(mut self, name: impl Into<String>, subscriber: S) -> Self
    where
        S: Subscriber<A, T>,
    {
        self.functions.insert(name.into(), Arc::new(subscriber));
        self
    }

    /// Set the priority used by `on` and `queue`.
    pub fn default_priority(mut self, priority: i32) -> Self {
        self.default_priority = priority;
        self
    }

    /// Get the number of named functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if no named function is defined.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Build the dispatcher.
    pub fn build(self) -> Dispatcher<A, T> {
        Dispatcher::from_parts(self.functions, self.default_priority)
    }
}

impl<A, T> Default for DispatcherBuilder<A, T>
where
    A: Send + Sync + 'static,
    T: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
