//! Subscriber responses and how dispatch interprets them.

use crate::error::BoxError;

/// What a subscriber answered for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response<T> {
    /// A result value.
    Value(T),
    /// No value. Collected as `None`, skipped by halting dispatch.
    Empty,
    /// Stop the current dispatch pass. Nothing is collected for this response
    /// and later subscribers are not invoked.
    Stop,
}

/// How dispatch proceeds after a [`Response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Record the value (`None` for an empty response) and invoke the next
    /// subscriber.
    Continue(Option<T>),
    /// Halting dispatch found its value; return it alone.
    StopWithValue(T),
    /// Halting dispatch was vetoed by [`Response::Stop`].
    Vetoed,
    /// End the pass without recording anything.
    StopSilently,
}

impl<T> Response<T> {
    /// Classify this response for a dispatch pass.
    ///
    /// The halt check runs first, so a halting pass returns the first value it
    /// sees, and a [`Response::Stop`] it meets is reported as a veto rather
    /// than as silence. A collecting pass ends quietly on [`Response::Stop`].
    pub fn classify(self, halt: bool) -> Outcome<T> {
        match self {
            Response::Value(value) if halt => Outcome::StopWithValue(value),
            Response::Value(value) => Outcome::Continue(Some(value)),
            Response::Empty => Outcome::Continue(None),
            Response::Stop if halt => Outcome::Vetoed,
            Response::Stop => Outcome::StopSilently,
        }
    }

    /// Returns `true` if this is [`Response::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Response::Empty)
    }

    /// Returns `true` if this is [`Response::Stop`].
    pub fn is_stop(&self) -> bool {
        matches!(self, Response::Stop)
    }

    /// Convert into the value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Response::Value(value) => Some(value),
            Response::Empty | Response::Stop => None,
        }
    }
}

impl<T> From<Option<T>> for Response<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Response::Empty, Response::Value)
    }
}

/// Trait for converting a subscriber's return value into a [`Response`].
///
/// # Default Implementations
///
/// - `Response<T>` → As is
/// - `Option<T>` → `Some` = `Value`, `None` = `Empty`
/// - `()` → `Empty`
/// - `Result<R, E>` → Delegates to inner `R` or propagates error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned by a subscriber producing `{T}`",
    label = "missing `IntoResponse<{T}>` implementation",
    note = "Return `Response<{T}>`, `Option<{T}>`, `()` or a `Result` of one of those."
)]
pub trait IntoResponse<T> {
    /// Convert the output into a response or an error.
    fn into_response(self) -> Result<Response<T>, BoxError>;
}

impl<T> IntoResponse<T> for Response<T> {
    fn into_response(self) -> Result<Response<T>, BoxError> {
        Ok(self)
    }
}

impl<T> IntoResponse<T> for Option<T> {
    fn into_response(self) -> Result<Response<T>, BoxError> {
        Ok(self.into())
    }
}

impl<T> IntoResponse<T> for () {
    fn into_response(self) -> Result<Response<T>, BoxError> {
        Ok(Response::Empty)
    }
}

impl<T, R, E> IntoResponse<T> for Result<R, E>
where
    R: IntoResponse<T>,
    E: Into<BoxError>,
{
    fn into_response(self) -> Result<Response<T>, BoxError> {
        match self {
            Ok(r) => r.into_response(),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halting_stops_on_first_value() {
        assert_eq!(Response::Value(1).classify(true), Outcome::StopWithValue(1));
        assert_eq!(Response::Value(1).classify(false), Outcome::Continue(Some(1)));
    }

    #[test]
    fn empty_never_stops() {
        assert_eq!(Response::<u8>::Empty.classify(true), Outcome::Continue(None));
        assert_eq!(Response::<u8>::Empty.classify(false), Outcome::Continue(None));
    }

    #[test]
    fn stop_ends_pass_in_both_modes() {
        assert_eq!(Response::<u8>::Stop.classify(true), Outcome::Vetoed);
        assert_eq!(Response::<u8>::Stop.classify(false), Outcome::StopSilently);
    }

    #[test]
    fn option_maps_to_value_or_empty() {
        assert_eq!(Some("x").into_response().unwrap(), Response::Value("x"));
        assert_eq!(
            IntoResponse::<&str>::into_response(None::<&str>).unwrap(),
            Response::Empty
        );
    }

    #[test]
    fn result_propagates_error() {
        let failed: Result<Option<u8>, std::io::Error> =
            Err(std::io::Error::other("subscriber broke"));
        let err = failed.into_response().unwrap_err();
        assert_eq!(err.to_string(), "subscriber broke");

        let ok: Result<Response<u8>, BoxError> = Ok(Response::Stop);
        assert!(ok.into_response().unwrap().is_stop());
    }

    #[test]
    fn into_value_drops_sentinels() {
        assert_eq!(Response::Value(3).into_value(), Some(3));
        assert_eq!(Response::<u8>::Empty.into_value(), None);
        assert_eq!(Response::<u8>::Stop.into_value(), None);
    }
}
