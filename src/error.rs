use std::any::{Any, TypeId};
use std::fmt;

/// An opaque capture of an error value.
///
/// Failures travel along a continuation chain as `Error` captures: an
/// explicit error handed to `Promise::set_error`, an `Err` returned from a
/// continuation, or the payload of a panic that unwound out of one. The
/// concrete type is erased at capture time and recovered by type-directed
/// matching, either through [`downcast`] or by attaching a typed handler with
/// `Future::error`.
///
/// [`downcast`]: #method.downcast
pub struct Error {
    payload: Box<dyn Any + Send>,
}

impl Error {
    /// Captures an error value.
    ///
    /// Capturing an `Error` returns the existing capture rather than nesting
    /// one inside another, so an error can be rethrown losslessly.
    pub fn new<E>(error: E) -> Error
        where E: Any + Send,
    {
        Error::from_payload(Box::new(error))
    }

    pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Error {
        match payload.downcast::<Error>() {
            Ok(error) => *error,
            Err(payload) => Error { payload: payload },
        }
    }

    /// Returns whether the captured value is of type `E`.
    pub fn is<E>(&self) -> bool
        where E: Any,
    {
        self.payload.is::<E>()
    }

    /// Attempts to move the captured value out as type `E`.
    ///
    /// On a type mismatch the capture is returned unchanged in the `Err`
    /// variant, which is what lets a chain of typed handlers try each type in
    /// turn. Requesting `Error` itself always succeeds and yields the whole
    /// capture.
    pub fn downcast<E>(self) -> Result<E, Error>
        where E: Any + Send,
    {
        if TypeId::of::<E>() == TypeId::of::<Error>() {
            let boxed: Box<dyn Any + Send> = Box::new(self);
            return Ok(*boxed.downcast::<E>().unwrap());
        }
        match self.payload.downcast::<E>() {
            Ok(error) => Ok(*error),
            Err(payload) => Err(Error { payload: payload }),
        }
    }

    /// Borrows the captured value as type `E`, if it has that type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
        where E: Any,
    {
        self.payload.downcast_ref::<E>()
    }

    /// Consumes the capture, returning the boxed error value.
    pub fn into_payload(self) -> Box<dyn Any + Send> {
        self.payload
    }

    // Panic payloads from string literals and `format!` are the common case
    // worth rendering; anything else stays opaque.
    fn message(&self) -> Option<&str> {
        if let Some(s) = self.payload.downcast_ref::<&'static str>() {
            Some(s)
        } else if let Some(s) = self.payload.downcast_ref::<String>() {
            Some(s)
        } else {
            None
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.message() {
            Some(message) => f.debug_tuple("Error").field(&message).finish(),
            None => f.write_str("Error(..)"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "captured error: {}", message),
            None => f.write_str("captured error"),
        }
    }
}

/// Error published to a chain whose `Promise` was dropped without being
/// resolved.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Canceled;

impl fmt::Display for Canceled {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("promise dropped before being resolved")
    }
}
