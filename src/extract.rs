//! Actual values and value extraction.
//!
//! Operands are modeled as a closed sum type, [`Actual`], over the supported
//! shapes: scalars, text, collections, a boxed indirection, a channel
//! receiver, a callable, and an error value. New shapes are added by
//! extending the enum, not by runtime type inspection.
//!
//! [`extract`] normalizes an actual before comparison: indirections unwrap,
//! channels try-receive, callables run. An empty or disconnected channel (and
//! a callable that produces nothing) extracts to `None`, which is *not* an
//! error; matchers that require a value use [`must_extract`] to turn `None`
//! into a failure.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use parking_lot::Mutex;

use crate::check::{Check, Failure};

/// A callable operand: produces a value (or nothing), or fails.
pub type Thunk = dyn Fn(&mut Check<'_>) -> Result<Option<Actual>, Failure> + Send + Sync;

/// One operand of an assertion.
#[derive(Clone)]
pub enum Actual {
    /// The absence of a value.
    Nil,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Signed(i64),
    /// An unsigned integer.
    Unsigned(u64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Text(String),
    /// A byte buffer.
    Bytes(Vec<u8>),
    /// An ordered collection of values.
    List(Vec<Actual>),
    /// An indirection; extraction unwraps it.
    Boxed(Box<Actual>),
    /// A channel receiver; extraction try-receives the next value.
    Channel(Arc<Mutex<Receiver<Actual>>>),
    /// A callable; extraction invokes it.
    Thunk(Arc<Thunk>),
    /// An error value, as produced by a failed operation under test.
    Fault(String),
}

impl Actual {
    /// Wrap a channel receiver as an actual value.
    #[must_use]
    pub fn channel(receiver: Receiver<Actual>) -> Self {
        Self::Channel(Arc::new(Mutex::new(receiver)))
    }

    /// Wrap a callable as an actual value.
    #[must_use]
    pub fn thunk(
        f: impl Fn(&mut Check<'_>) -> Result<Option<Actual>, Failure> + Send + Sync + 'static,
    ) -> Self {
        Self::Thunk(Arc::new(f))
    }

    /// Wrap an error value as an actual value.
    #[must_use]
    pub fn fault(error: impl fmt::Display) -> Self {
        Self::Fault(error.to_string())
    }

    /// Wrap a byte buffer as an actual value.
    #[must_use]
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Box an actual value behind an indirection.
    #[must_use]
    pub fn boxed(inner: Actual) -> Self {
        Self::Boxed(Box::new(inner))
    }

    /// Convert a `Result` into either its value or a [`Actual::Fault`].
    pub fn from_result<T: Into<Actual>, E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => value.into(),
            Err(error) => Self::fault(error),
        }
    }
}

impl fmt::Debug for Actual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Signed(n) => write!(f, "{n}"),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "{b:?}"),
            Self::List(items) => f.debug_list().entries(items).finish(),
            Self::Boxed(inner) => fmt::Debug::fmt(inner, f),
            Self::Channel(_) => f.write_str("<channel>"),
            Self::Thunk(_) => f.write_str("<callable>"),
            Self::Fault(e) => write!(f, "error({e})"),
        }
    }
}

impl PartialEq for Actual {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Indirections compare by their contents.
            (Self::Boxed(a), b) => (**a).eq(b),
            (a, Self::Boxed(b)) => a.eq(b),
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Signed(a), Self::Signed(b)) => a == b,
            (Self::Unsigned(a), Self::Unsigned(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Fault(a), Self::Fault(b)) => a == b,
            // Channels and callables have no value identity.
            _ => false,
        }
    }
}

impl From<bool> for Actual {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! actual_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Actual {
            fn from(value: $ty) -> Self {
                Self::Signed(i64::from(value))
            }
        })*
    };
}

macro_rules! actual_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Actual {
            fn from(value: $ty) -> Self {
                Self::Unsigned(u64::from(value))
            }
        })*
    };
}

actual_from_signed!(i8, i16, i32, i64);
actual_from_unsigned!(u8, u16, u32, u64);

impl From<f32> for Actual {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Actual {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Actual {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Actual {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<Actual>> for Actual {
    fn from(value: Vec<Actual>) -> Self {
        Self::List(value)
    }
}

impl<T: Into<Actual>> From<Option<T>> for Actual {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

/// Normalize an actual value for comparison.
///
/// Returns `Ok(None)` when no value is available (empty channel, callable
/// that produced nothing); that is a valid outcome, not an error.
pub fn extract(cx: &mut Check<'_>, actual: &Actual) -> Result<Option<Actual>, Failure> {
    match actual {
        Actual::Boxed(inner) => extract(cx, inner),
        Actual::Channel(receiver) => {
            let received = receiver.lock().try_recv();
            match received {
                Ok(value) => extract(cx, &value),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => Ok(None),
            }
        }
        Actual::Thunk(f) => match f(cx)? {
            Some(value) => extract(cx, &value),
            None => Ok(None),
        },
        other => Ok(Some(other.clone())),
    }
}

/// [`extract`], but a missing value is a failure.
pub fn must_extract(cx: &mut Check<'_>, actual: &Actual) -> Result<Actual, Failure> {
    extract(cx, actual)?.ok_or_else(|| {
        Failure::new(format!(
            "Value could not be extracted from actual: {actual:?}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::TickShared;
    use std::sync::mpsc;

    fn contained_check(shared: &TickShared) -> Check<'_> {
        Check::contained(shared)
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Actual::from(3_i32), Actual::Signed(3));
        assert_eq!(Actual::from(3_u8), Actual::Unsigned(3));
        assert_eq!(Actual::from(1.5_f64), Actual::Float(1.5));
        assert_eq!(Actual::from("hi"), Actual::Text("hi".to_string()));
        assert_eq!(Actual::from(true), Actual::Bool(true));
        assert_eq!(Actual::from(None::<i32>), Actual::Nil);
        assert_eq!(Actual::from(Some(7_i32)), Actual::Signed(7));
    }

    #[test]
    fn test_from_result() {
        assert_eq!(Actual::from_result::<i32, String>(Ok(5)), Actual::Signed(5));
        assert_eq!(
            Actual::from_result::<i32, &str>(Err("boom")),
            Actual::Fault("boom".to_string())
        );
    }

    #[test]
    fn test_boxed_equality_unwraps() {
        assert_eq!(Actual::boxed(Actual::Signed(1)), Actual::Signed(1));
        assert_eq!(Actual::Signed(1), Actual::boxed(Actual::Signed(1)));
    }

    #[test]
    fn test_extract_scalar_is_identity() {
        let shared = TickShared::default();
        let mut cx = contained_check(&shared);
        let extracted = extract(&mut cx, &Actual::Signed(42)).unwrap();
        assert_eq!(extracted, Some(Actual::Signed(42)));
    }

    #[test]
    fn test_extract_channel_receives_next_value() {
        let shared = TickShared::default();
        let mut cx = contained_check(&shared);
        let (tx, rx) = mpsc::channel();
        tx.send(Actual::Text("first".to_string())).unwrap();
        let actual = Actual::channel(rx);

        let extracted = extract(&mut cx, &actual).unwrap();
        assert_eq!(extracted, Some(Actual::Text("first".to_string())));

        // Channel is now empty: no value, but not an error.
        let extracted = extract(&mut cx, &actual).unwrap();
        assert_eq!(extracted, None);
    }

    #[test]
    fn test_extract_disconnected_channel_is_none() {
        let shared = TickShared::default();
        let mut cx = contained_check(&shared);
        let (tx, rx) = mpsc::channel::<Actual>();
        drop(tx);
        let extracted = extract(&mut cx, &Actual::channel(rx)).unwrap();
        assert_eq!(extracted, None);
    }

    #[test]
    fn test_extract_thunk_recurses() {
        let shared = TickShared::default();
        let mut cx = contained_check(&shared);
        let actual = Actual::thunk(|_cx| Ok(Some(Actual::boxed(Actual::Unsigned(9)))));
        let extracted = extract(&mut cx, &actual).unwrap();
        assert_eq!(extracted, Some(Actual::Unsigned(9)));
    }

    #[test]
    fn test_extract_thunk_failure_propagates() {
        let shared = TickShared::default();
        let mut cx = contained_check(&shared);
        let actual = Actual::thunk(|_cx| Err(Failure::new("thunk failed")));
        let err = extract(&mut cx, &actual).unwrap_err();
        assert_eq!(err.message(), "thunk failed");
    }

    #[test]
    fn test_must_extract_missing_value_is_failure() {
        let shared = TickShared::default();
        let mut cx = contained_check(&shared);
        let actual = Actual::thunk(|_cx| Ok(None));
        let err = must_extract(&mut cx, &actual).unwrap_err();
        assert!(err.message().starts_with("Value could not be extracted"));
    }

    #[test]
    fn test_debug_rendering() {
        assert_eq!(format!("{:?}", Actual::Nil), "nil");
        assert_eq!(format!("{:?}", Actual::Signed(-3)), "-3");
        assert_eq!(format!("{:?}", Actual::Text("x".into())), "\"x\"");
        assert_eq!(format!("{:?}", Actual::fault("oops")), "error(oops)");
        let (_tx, rx) = mpsc::channel::<Actual>();
        assert_eq!(format!("{:?}", Actual::channel(rx)), "<channel>");
    }
}
