//! Testing utilities for Herald.
//!
//! This module provides subscribers that make dispatch behaviour easy to
//! observe in tests.
//!
//! # Features
//!
//! - [`RecordingSubscriber`]: records every argument list and answers a
//!   programmed response or error
//! - [`CountingSubscriber`]: counts invocations

use herald_core::{BoxError, Response, Subscriber};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Subscriber
// ============================================================================

/// A subscriber that records all argument lists it receives.
///
/// Clones share the same record, so keep one clone for assertions and
/// register the other.
///
/// # Example
///
/// ```rust
/// use herald::{Dispatcher, Payload, Response, testing::RecordingSubscriber};
///
/// let recorder = RecordingSubscriber::with_response(Response::Value("ok"));
/// let dispatcher: Dispatcher<&str, &str> = Dispatcher::new();
/// dispatcher.subscribe_with("evt", recorder.clone(), 0);
///
/// dispatcher.dispatch("evt", Payload::Single("a")).unwrap();
/// assert_eq!(recorder.calls(), vec![vec!["a"]]);
/// ```
pub struct RecordingSubscriber<A: Clone, T: Clone> {
    calls: Arc<Mutex<Vec<Vec<A>>>>,
    response: Response<T>,
    error: Option<String>,
}

impl<A: Clone, T: Clone> RecordingSubscriber<A, T> {
    /// Create a new recording subscriber that answers `Empty`.
    pub fn new() -> Self {
        Self::with_response(Response::Empty)
    }

    /// Create a recording subscriber that answers a specific response.
    pub fn with_response(response: Response<T>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response,
            error: None,
        }
    }

    /// Create a recording subscriber that fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new()
        }
    }

    /// Get a clone of the recorded argument lists.
    pub fn calls(&self) -> Vec<Vec<A>> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the number of recorded invocations.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Clear all recorded invocations.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl<A: Clone, T: Clone> Default for RecordingSubscriber<A, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Clone, T: Clone> Clone for RecordingSubscriber<A, T> {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
            response: self.response.clone(),
            error: self.error.clone(),
        }
    }
}

impl<A, T> Subscriber<A, T> for RecordingSubscriber<A, T>
where
    A: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn invoke(&self, args: &[A]) -> Result<Response<T>, BoxError> {
        self.calls.lock().unwrap().push(args.to_vec());

        if let Some(ref err) = self.error {
            return Err(err.clone().into());
        }

        Ok(self.response.clone())
    }
}

// ============================================================================
// Counting Subscriber
// ============================================================================

/// A subscriber that counts invocations and answers `Empty`.
///
/// # Example
///
/// ```rust
/// use herald::{Dispatcher, Payload, testing::CountingSubscriber};
///
/// let counter = CountingSubscriber::new();
/// let dispatcher: Dispatcher<u8, u8> = Dispatcher::new();
/// dispatcher.subscribe_with("evt", counter.clone(), 0);
///
/// dispatcher.dispatch("evt", Payload::Empty).unwrap();
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CountingSubscriber {
    count: Arc<AtomicUsize>,
}

impl CountingSubscriber {
    /// Create a new counting subscriber.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Clone for CountingSubscriber {
    fn clone(&self) -> Self {
        Self {
            count: self.count.clone(),
        }
    }
}

impl<A, T> Subscriber<A, T> for CountingSubscriber
where
    A: 'static,
    T: 'static,
{
    fn invoke(&self, _args: &[A]) -> Result<Response<T>, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(Response::Empty)
    }
}
