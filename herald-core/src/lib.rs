//! # herald-core
//!
//! Core types for the Herald event dispatcher.
//!
//! This crate has minimal dependencies and holds the vocabulary shared by the
//! dispatcher and by code that only defines subscribers:
//!
//! - [`Subscriber`]: the uniform call interface. Closures of shape
//!   `Fn(&[A]) -> R` are subscribers when `R: IntoResponse<T>`.
//! - [`Callable`]: what gets registered; an invocable value or the name of a
//!   function defined on the dispatcher.
//! - [`Response`] and [`Outcome`]: what a subscriber answered and how a
//!   dispatch pass proceeds because of it.
//! - [`Payload`]: the explicit argument shapes of a dispatch.
//!
//! # Error Types
//!
//! - [`SubscriberNotCallable`] - Registration-time error
//! - [`HeraldError`] - Top-level error type
//! - [`BoxError`] - Errors raised by subscribers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod payload;
mod response;
mod subscriber;

// Re-exports
pub use error::{BoxError, HeraldError, SubscriberNotCallable};
pub use payload::Payload;
pub use response::{IntoResponse, Outcome, Response};
pub use subscriber::{Callable, SharedSubscriber, Subscriber};
