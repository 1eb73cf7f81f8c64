//! The event dispatcher.
//!
//! [`Dispatcher`] is a cloneable handle to a [`Registry`] of subscribers and
//! deferred dispatches. The registry lock is held only while the maps are read
//! or changed, never while a subscriber runs, so subscribers may call back
//! into the dispatcher. Such calls affect later passes only: every pass works
//! on the snapshot returned by [`Dispatcher::get_subscribers`].

use crate::{
    builder::DispatcherBuilder,
    registry::{DEFAULT_PRIORITY, Registry},
};
use herald_core::{
    BoxError, Callable, IntoResponse, Outcome, Payload, SharedSubscriber, Subscriber,
    SubscriberNotCallable,
};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

/// Suffix appended to an event name to form its queue event name.
pub const QUEUE_SUFFIX: &str = "__queue";

/// The event name under which deferred dispatches of `event` are stored.
pub fn queue_name(event: &str) -> String {
    format!("{event}{QUEUE_SUFFIX}")
}

/// Result of a dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched<T> {
    /// Collecting pass: every recorded response, `None` for empty ones.
    Collected(Vec<Option<T>>),
    /// Halting pass: the first value a subscriber answered.
    Halted(T),
    /// Halting pass ended by a [`Response::Stop`] before any value.
    ///
    /// [`Response::Stop`]: herald_core::Response::Stop
    Stopped,
    /// Halting pass that ran out of subscribers without a value.
    Exhausted,
}

impl<T> Dispatched<T> {
    /// The collected responses. A halted value becomes a one-element list.
    pub fn into_collected(self) -> Vec<Option<T>> {
        match self {
            Dispatched::Collected(responses) => responses,
            Dispatched::Halted(value) => vec![Some(value)],
            Dispatched::Stopped | Dispatched::Exhausted => Vec::new(),
        }
    }

    /// The first value, if any.
    pub fn into_first(self) -> Option<T> {
        match self {
            Dispatched::Collected(responses) => responses.into_iter().flatten().next(),
            Dispatched::Halted(value) => Some(value),
            Dispatched::Stopped | Dispatched::Exhausted => None,
        }
    }
}

/// A registered item, as returned by [`Dispatcher::get_subscribers`].
pub enum Entry<A, T> {
    /// A subscriber.
    Subscriber(SharedSubscriber<A, T>),
    /// A queued dispatch, stored under a queue event name.
    Deferred(Arc<Deferred<A, T>>),
}

impl<A, T> Clone for Entry<A, T> {
    fn clone(&self) -> Self {
        match self {
            Entry::Subscriber(subscriber) => Entry::Subscriber(subscriber.clone()),
            Entry::Deferred(deferred) => Entry::Deferred(deferred.clone()),
        }
    }
}

impl<A: fmt::Debug, T> fmt::Debug for Entry<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Subscriber(_) => f.write_str("Entry::Subscriber(..)"),
            Entry::Deferred(deferred) => f.debug_tuple("Entry::Deferred").field(deferred).finish(),
        }
    }
}

impl<A, T> Entry<A, T> {
    /// Returns `true` for queued dispatches.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Entry::Deferred(_))
    }
}

/// A dispatch captured by [`Dispatcher::queue`].
///
/// Holds a weak handle to the dispatcher state; the registry never keeps
/// itself alive.
pub struct Deferred<A, T> {
    state: Weak<Mutex<State<A, T>>>,
    event: String,
    args: Vec<A>,
}

impl<A, T> Deferred<A, T> {
    /// The event this entry dispatches.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The arguments captured at queue time.
    pub fn args(&self) -> &[A] {
        &self.args
    }
}

impl<A, T> Deferred<A, T>
where
    A: Send + Sync + 'static,
    T: 'static,
{
    /// Run the captured dispatch. Yields nothing once the dispatcher is gone.
    pub fn run(&self) -> Result<Vec<Option<T>>, BoxError> {
        match self.state.upgrade() {
            Some(state) => Dispatcher { state }
                .run(&self.event, &self.args, false)
                .map(Dispatched::into_collected),
            None => Ok(Vec::new()),
        }
    }
}

impl<A: fmt::Debug, T> fmt::Debug for Deferred<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("event", &self.event)
            .field("args", &self.args)
            .finish()
    }
}

pub(crate) struct State<A, T> {
    registry: Registry<Entry<A, T>>,
    functions: HashMap<String, SharedSubscriber<A, T>>,
    default_priority: i32,
}

/// In-process event dispatcher.
///
/// Subscribers are registered per event name with an integer priority;
/// higher priorities run first, equal priorities in registration order.
///
/// # Example
///
/// ```
/// use herald::{Dispatcher, Payload};
///
/// let dispatcher: Dispatcher<String, String> = Dispatcher::new();
/// dispatcher
///     .on("multi", |args: &[String]| Some(format!("{} 1", args[0])))
///     .on("multi", |args: &[String]| Some(format!("{} 2", args[0])));
///
/// let first = dispatcher.dispatch_halt("multi", Payload::Single("data".into())).unwrap();
/// assert_eq!(first.as_deref(), Some("data 1"));
///
/// let all = dispatcher.dispatch("multi", Payload::Single("data".into())).unwrap();
/// assert_eq!(all, vec![Some("data 1".to_string()), Some("data 2".to_string())]);
/// ```
pub struct Dispatcher<A, T> {
    state: Arc<Mutex<State<A, T>>>,
}

impl<A, T> Clone for Dispatcher<A, T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<A, T> fmt::Debug for Dispatcher<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Dispatcher")
            .field("registry", &state.registry)
            .field("functions", &state.functions.len())
            .field("default_priority", &state.default_priority)
            .finish()
    }
}

impl<A, T> Dispatcher<A, T> {
    pub(crate) fn from_parts(
        functions: HashMap<String, SharedSubscriber<A, T>>,
        default_priority: i32,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                registry: Registry::new(),
                functions,
                default_priority,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<A, T>> {
        // Subscribers never run under the lock, so a poisoned map is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A, T> Dispatcher<A, T>
where
    A: Send + Sync + 'static,
    T: 'static,
{
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::from_parts(HashMap::new(), DEFAULT_PRIORITY)
    }

    /// Start configuring a dispatcher.
    pub fn builder() -> DispatcherBuilder<A, T> {
        DispatcherBuilder::new()
    }

    /// The priority used by [`on`](Self::on) and [`queue`](Self::queue).
    pub fn default_priority(&self) -> i32 {
        self.lock().default_priority
    }

    /// Define a named function that [`Callable::Named`] subscribers resolve to.
    ///
    /// Redefining a name affects later subscriptions only.
    pub fn define<F, R>(&self, name: impl Into<String>, f: F) -> &Self
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoResponse<T>,
    {
        self.lock().functions.insert(name.into(), Arc::new(f));
        self
    }

    /// Subscribe to `event` at `priority`.
    ///
    /// Named callables are resolved now; an unknown name fails with
    /// [`SubscriberNotCallable`] and leaves the registry untouched.
    pub fn subscribe(
        &self,
        event: impl Into<String>,
        subscriber: impl Into<Callable<A, T>>,
        priority: i32,
    ) -> Result<&Self, SubscriberNotCallable> {
        let event = event.into();
        let mut state = self.lock();
        let subscriber = subscriber
            .into()
            .resolve(|name| state.functions.get(name).cloned())?;
        state
            .registry
            .insert(event.as_str(), Entry::Subscriber(subscriber), priority);

        #[cfg(feature = "tracing")]
        tracing::debug!(event = %event, priority, "subscriber registered");

        Ok(self)
    }

    /// Subscribe a closure at the default priority.
    pub fn on<F, R>(&self, event: impl Into<String>, f: F) -> &Self
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoResponse<T>,
    {
        let priority = self.default_priority();
        self.on_with_priority(event, f, priority)
    }

    /// Subscribe a closure at `priority`.
    pub fn on_with_priority<F, R>(&self, event: impl Into<String>, f: F, priority: i32) -> &Self
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoResponse<T>,
    {
        self.insert(event.into(), Entry::Subscriber(Arc::new(f)), priority);
        self
    }

    /// Subscribe any [`Subscriber`] implementation at `priority`.
    pub fn subscribe_with<S>(&self, event: impl Into<String>, subscriber: S, priority: i32) -> &Self
    where
        S: Subscriber<A, T>,
    {
        self.insert(event.into(), Entry::Subscriber(Arc::new(subscriber)), priority);
        self
    }

    fn insert(&self, event: String, entry: Entry<A, T>, priority: i32) {
        #[cfg(feature = "tracing")]
        tracing::debug!(event = %event, priority, deferred = entry.is_deferred(), "entry registered");

        self.lock().registry.insert(event, entry, priority);
    }

    /// Remove every subscriber of `event`. Unknown events are ignored.
    pub fn remove_event(&self, event: &str) -> &Self {
        let _removed = self.lock().registry.remove(event);

        #[cfg(feature = "tracing")]
        tracing::debug!(event, removed = _removed, "event removed");

        self
    }

    /// Rebuild the priority-ordered subscriber list of `event`.
    pub fn sort_subscribers(&self, event: &str) -> Arc<[Entry<A, T>]> {
        let sorted = self.lock().registry.sort(event);

        #[cfg(feature = "tracing")]
        tracing::trace!(event, subscribers = sorted.len(), "subscribers sorted");

        sorted
    }

    /// The priority-ordered subscriber list of `event`, from cache when
    /// possible.
    pub fn get_subscribers(&self, event: &str) -> Arc<[Entry<A, T>]> {
        self.lock().registry.get(event)
    }

    /// Whether `event` has any subscriber.
    pub fn has_subscribers(&self, event: &str) -> bool {
        self.lock().registry.contains(event)
    }

    /// Number of subscribers registered for `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.lock().registry.count(event)
    }

    /// Every event name with subscribers, sorted.
    pub fn event_names(&self) -> Vec<String> {
        self.lock().registry.event_names()
    }

    /// Invoke every subscriber of `event` and collect their responses.
    ///
    /// Empty responses are collected as `None`. A [`Response::Stop`] ends the
    /// pass without being collected. Subscriber errors abort the pass and are
    /// returned unchanged.
    ///
    /// [`Response::Stop`]: herald_core::Response::Stop
    pub fn dispatch(
        &self,
        event: &str,
        payload: impl Into<Payload<A>>,
    ) -> Result<Vec<Option<T>>, BoxError> {
        self.dispatch_with(event, payload, false)
            .map(Dispatched::into_collected)
    }

    /// Invoke subscribers of `event` until one answers a value and return it.
    ///
    /// Returns `None` both when no subscriber answered a value and when a
    /// [`Response::Stop`] vetoed the pass; use
    /// [`dispatch_with`](Self::dispatch_with) to tell the two apart.
    ///
    /// A queued dispatch met on the way (see [`queue`](Self::queue)) runs in
    /// full and answers its first collected value; its other values are
    /// dropped. One that collects no value counts as empty and the pass goes
    /// on.
    ///
    /// [`Response::Stop`]: herald_core::Response::Stop
    pub fn dispatch_halt(
        &self,
        event: &str,
        payload: impl Into<Payload<A>>,
    ) -> Result<Option<T>, BoxError> {
        self.dispatch_with(event, payload, true)
            .map(Dispatched::into_first)
    }

    /// Dispatch `event`, halting on the first value when `halt` is set.
    ///
    /// A halting pass ends in [`Dispatched::Halted`], [`Dispatched::Stopped`]
    /// when a subscriber answered [`Response::Stop`] first, or
    /// [`Dispatched::Exhausted`].
    ///
    /// [`Response::Stop`]: herald_core::Response::Stop
    pub fn dispatch_with(
        &self,
        event: &str,
        payload: impl Into<Payload<A>>,
        halt: bool,
    ) -> Result<Dispatched<T>, BoxError> {
        let args = payload.into().into_args();
        self.run(event, &args, halt)
    }

    fn run(&self, event: &str, args: &[A], halt: bool) -> Result<Dispatched<T>, BoxError> {
        let entries = self.get_subscribers(event);

        #[cfg(feature = "tracing")]
        tracing::debug!(event, subscribers = entries.len(), halt, "dispatching");

        let mut responses = Vec::new();
        for entry in entries.iter() {
            match entry {
                Entry::Subscriber(subscriber) => match subscriber.invoke(args)?.classify(halt) {
                    Outcome::StopWithValue(value) => return Ok(Dispatched::Halted(value)),
                    Outcome::Vetoed => return Ok(Dispatched::Stopped),
                    Outcome::StopSilently => break,
                    Outcome::Continue(response) => responses.push(response),
                },
                Entry::Deferred(deferred) => {
                    let results = deferred.run()?;
                    if halt {
                        if let Some(value) = results.into_iter().flatten().next() {
                            return Ok(Dispatched::Halted(value));
                        }
                    } else {
                        responses.extend(results);
                    }
                }
            }
        }

        Ok(if halt {
            Dispatched::Exhausted
        } else {
            Dispatched::Collected(responses)
        })
    }

    /// Defer a dispatch of `event` with `payload` until [`flush`](Self::flush).
    ///
    /// Each call adds another deferred dispatch under [`queue_name`]`(event)`.
    pub fn queue(&self, event: &str, payload: impl Into<Payload<A>>) -> &Self {
        let priority = self.default_priority();
        self.queue_with_priority(event, payload, priority)
    }

    /// Defer a dispatch of `event` at `priority` within the queue.
    pub fn queue_with_priority(
        &self,
        event: &str,
        payload: impl Into<Payload<A>>,
        priority: i32,
    ) -> &Self {
        let deferred = Deferred {
            state: Arc::downgrade(&self.state),
            event: event.to_owned(),
            args: payload.into().into_args(),
        };
        self.insert(queue_name(event), Entry::Deferred(Arc::new(deferred)), priority);
        self
    }

    /// Run every queued dispatch of `event` and concatenate their results.
    ///
    /// The queue is kept; flushing again repeats the dispatches. Use
    /// [`clear_queue`](Self::clear_queue) to drop them.
    pub fn flush(&self, event: &str) -> Result<Vec<Option<T>>, BoxError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(event, "flushing queue");

        self.dispatch(&queue_name(event), Payload::Empty)
    }

    /// Drop every queued dispatch of `event`.
    pub fn clear_queue(&self, event: &str) -> &Self {
        self.remove_event(&queue_name(event))
    }
}

impl<A, T> Default for Dispatcher<A, T>
where
    A: Send + Sync + 'static,
    T: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::Response;

    fn echo(args: &[&'static str]) -> Option<&'static str> {
        args.first().copied()
    }

    #[test]
    fn deferred_outliving_dispatcher_yields_nothing() {
        let dispatcher: Dispatcher<&'static str, &'static str> = Dispatcher::new();
        dispatcher.on("evt", echo).queue("evt", Payload::Single("x"));

        let queued = dispatcher.get_subscribers(&queue_name("evt"));
        drop(dispatcher);

        match &queued[0] {
            Entry::Deferred(deferred) => {
                assert_eq!(deferred.event(), "evt");
                assert_eq!(deferred.args(), &["x"]);
                assert!(deferred.run().unwrap().is_empty());
            }
            Entry::Subscriber(_) => panic!("expected a deferred entry"),
        }
    }

    #[test]
    fn queue_does_not_keep_dispatcher_alive() {
        let dispatcher: Dispatcher<u8, u8> = Dispatcher::new();
        dispatcher.queue("evt", Payload::Empty);
        assert_eq!(Arc::strong_count(&dispatcher.state), 1);
        assert_eq!(Arc::weak_count(&dispatcher.state), 1);
    }

    #[test]
    fn halting_through_deferred_returns_first_value() {
        let dispatcher: Dispatcher<u8, u8> = Dispatcher::new();
        dispatcher
            .on("evt", |_: &[u8]| Response::Empty)
            .on("evt", |args: &[u8]| Some(args[0] * 2))
            .queue("evt", Payload::Single(4));

        let first = dispatcher
            .dispatch_halt(&queue_name("evt"), Payload::Empty)
            .unwrap();
        assert_eq!(first, Some(8));
    }

    #[test]
    fn halting_through_empty_deferred_keeps_going() {
        let dispatcher: Dispatcher<u8, u8> = Dispatcher::new();
        dispatcher
            .queue("nobody", Payload::Empty)
            .on(queue_name("nobody"), |_: &[u8]| Some(1));

        let outcome = dispatcher
            .dispatch_with(&queue_name("nobody"), Payload::Empty, true)
            .unwrap();
        assert_eq!(outcome, Dispatched::Halted(1));
    }

    #[test]
    fn dispatched_conversions() {
        assert_eq!(
            Dispatched::Collected(vec![None, Some(2), Some(3)]).into_first(),
            Some(2)
        );
        assert_eq!(Dispatched::Halted(5).into_collected(), vec![Some(5)]);
        assert!(Dispatched::<u8>::Exhausted.into_collected().is_empty());
        assert_eq!(Dispatched::<u8>::Exhausted.into_first(), None);
        assert!(Dispatched::<u8>::Stopped.into_collected().is_empty());
        assert_eq!(Dispatched::<u8>::Stopped.into_first(), None);
    }

    #[test]
    fn halting_stop_is_reported_apart_from_silence() {
        let dispatcher: Dispatcher<u8, u8> = Dispatcher::new();
        dispatcher
            .on("vetoed", |_: &[u8]| Response::Stop)
            .on("vetoed", |_: &[u8]| Some(1))
            .on("silent", |_: &[u8]| ());

        let vetoed = dispatcher.dispatch_with("vetoed", Payload::Empty, true).unwrap();
        let silent = dispatcher.dispatch_with("silent", Payload::Empty, true).unwrap();
        assert_eq!(vetoed, Dispatched::Stopped);
        assert_eq!(silent, Dispatched::Exhausted);
        assert_ne!(vetoed, silent);
        assert_eq!(dispatcher.dispatch_halt("vetoed", Payload::Empty).unwrap(), None);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn operations_emit_tracing_events() {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let dispatcher: Dispatcher<u8, u8> = Dispatcher::new();
            dispatcher
                .on("evt", |args: &[u8]| Some(args[0]))
                .queue("evt", Payload::Single(7));
            dispatcher.sort_subscribers("evt");

            assert_eq!(dispatcher.flush("evt").unwrap(), vec![Some(7)]);
            dispatcher.remove_event("evt");
            assert!(dispatcher.dispatch("evt", Payload::Single(1)).unwrap().is_empty());
        });
    }

    #[test]
    fn debug_summarises_state() {
        let dispatcher: Dispatcher<u8, u8> = Dispatcher::new();
        dispatcher.on("evt", |_: &[u8]| ());
        assert_eq!(
            format!("{dispatcher:?}"),
            "Dispatcher { registry: Registry { events: [(\"evt\", 1)], cached: 0 }, functions: 0, default_priority: 0 }"
        );
    }
}
