//! Dispatch payloads.

/// The arguments a dispatch passes to every subscriber.
///
/// Three explicit call shapes instead of inspecting the value at runtime:
/// no arguments, one argument, or an argument list. Each normalises to the
/// same positional list via [`Payload::into_args`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<A> {
    /// No arguments.
    Empty,
    /// Exactly one argument.
    Single(A),
    /// An explicit argument list, passed through as is.
    List(Vec<A>),
}

impl<A> Payload<A> {
    /// Normalise into the positional argument list handed to subscribers.
    pub fn into_args(self) -> Vec<A> {
        match self {
            Payload::Empty => Vec::new(),
            Payload::Single(arg) => vec![arg],
            Payload::List(args) => args,
        }
    }
}

impl<A> Default for Payload<A> {
    fn default() -> Self {
        Payload::Empty
    }
}

impl<A> From<()> for Payload<A> {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

impl<A> From<Vec<A>> for Payload<A> {
    fn from(args: Vec<A>) -> Self {
        Payload::List(args)
    }
}

impl<A, const N: usize> From<[A; N]> for Payload<A> {
    fn from(args: [A; N]) -> Self {
        Payload::List(args.into())
    }
}

impl<A> From<Option<A>> for Payload<A> {
    fn from(arg: Option<A>) -> Self {
        arg.map_or(Payload::Empty, Payload::Single)
    }
}
