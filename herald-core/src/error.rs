//! Error types for Herald.
//!
//! The dispatcher has a single domain error, [`SubscriberNotCallable`], raised
//! when a subscriber cannot be resolved at registration time. Failures raised
//! by subscribers themselves travel as [`BoxError`] and are never translated.
//!
//! [`HeraldError`] merges both paths for applications that want one error type.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The subscriber passed to `subscribe` could not be resolved to something
/// invocable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("subscriber `{name}` is not callable")]
pub struct SubscriberNotCallable {
    /// The name the subscriber was registered under.
    pub name: String,
}

impl SubscriberNotCallable {
    /// Create the error for the given subscriber name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Top-level error type for all Herald operations.
#[derive(Error, Debug)]
pub enum HeraldError {
    /// A subscriber was rejected at registration time.
    #[error("registration error: {0}")]
    NotCallable(#[from] SubscriberNotCallable),

    /// A subscriber failed while being invoked.
    #[error(transparent)]
    Subscriber(BoxError),
}

impl From<BoxError> for HeraldError {
    fn from(err: BoxError) -> Self {
        HeraldError::Subscriber(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_callable_names_the_subscriber() {
        let err = SubscriberNotCallable::new("missing_fn");
        assert_eq!(err.to_string(), "subscriber `missing_fn` is not callable");
    }

    #[test]
    fn subscriber_errors_pass_through_unchanged() {
        let inner: BoxError = "disk on fire".into();
        let err = HeraldError::from(inner);
        assert_eq!(err.to_string(), "disk on fire");
        assert!(matches!(err, HeraldError::Subscriber(_)));
    }

    #[test]
    fn registration_errors_convert_with_question_mark() {
        fn register() -> Result<(), HeraldError> {
            Err(SubscriberNotCallable::new("nope"))?;
            Ok(())
        }

        let err = register().unwrap_err();
        assert!(matches!(err, HeraldError::NotCallable(ref e) if e.name == "nope"));
        assert_eq!(
            err.to_string(),
            "registration error: subscriber `nope` is not callable"
        );
    }
}
