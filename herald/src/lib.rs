//! # herald - In-Process Prioritized Event Dispatcher
//!
//! `herald` maps event names to subscribers ordered by priority and invokes
//! them synchronously when the event is dispatched.
//!
//! ## Quick Start
//!
//! ```rust
//! use herald::{Dispatcher, Payload, Response};
//!
//! let dispatcher: Dispatcher<String, String> = Dispatcher::new();
//!
//! // Higher priority runs first.
//! dispatcher.on_with_priority("saved", |args: &[String]| Some(format!("audit {}", args[0])), 10);
//! dispatcher.on("saved", |args: &[String]| Some(format!("index {}", args[0])));
//!
//! let results = dispatcher.dispatch("saved", Payload::Single("doc-1".into())).unwrap();
//! assert_eq!(results, vec![Some("audit doc-1".to_string()), Some("index doc-1".to_string())]);
//!
//! // `Response::Stop` ends the pass.
//! dispatcher.on_with_priority("saved", |_: &[String]| Response::Stop, 20);
//! assert!(dispatcher.dispatch("saved", Payload::Single("doc-2".into())).unwrap().is_empty());
//! ```
//!
//! ## Dispatch Modes
//!
//! - [`Dispatcher::dispatch`] collects every response.
//! - [`Dispatcher::dispatch_halt`] returns the first value and skips the rest.
//! - [`Dispatcher::queue`] and [`Dispatcher::flush`] defer a dispatch.
//!
//! ## Features
//!
//! - `tracing`: emit registration and dispatch events through `tracing`.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use herald_core::{
    // Error types
    BoxError,
    // Subscribers
    Callable,
    HeraldError,
    IntoResponse,
    // Responses
    Outcome,
    // Payloads
    Payload,
    Response,
    SharedSubscriber,
    Subscriber,
    SubscriberNotCallable,
};

pub mod builder;
pub mod dispatcher;
pub mod registry;
pub mod testing;

pub use builder::DispatcherBuilder;
pub use dispatcher::{Deferred, Dispatched, Dispatcher, Entry, QUEUE_SUFFIX, queue_name};
pub use registry::{DEFAULT_PRIORITY, Registry};
