//! Numeric narrowing for the ordering matchers.
//!
//! Comparisons are defined within a single numeric shape (signed, unsigned,
//! or float), mirroring the comparison matchers' contract: comparing values
//! of different shapes is a matcher failure, not a silent coercion.

use std::cmp::Ordering;
use std::fmt;

use crate::check::{Check, Failure};
use crate::extract::{Actual, must_extract};

/// A numeric value narrowed from an [`Actual`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    /// A signed integer.
    Signed(i64),
    /// An unsigned integer.
    Unsigned(u64),
    /// A floating-point number.
    Float(f64),
}

impl Numeric {
    /// Human-readable shape name, used in mismatch messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Signed(_) => "signed integer",
            Self::Unsigned(_) => "unsigned integer",
            Self::Float(_) => "float",
        }
    }

    /// Compare two values of the same shape.
    ///
    /// Returns `None` when the shapes differ. Floats use total ordering, so
    /// NaN compares deterministically.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Signed(a), Self::Signed(b)) => Some(a.cmp(b)),
            (Self::Unsigned(a), Self::Unsigned(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Some(a.total_cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(n) => write!(f, "{n}"),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

/// Narrow a numeric-shaped [`Actual`] without an evaluation context.
///
/// For validating matcher bounds at construction time; non-numeric shapes
/// yield `None` and the caller treats that as a programmer error.
#[must_use]
pub fn numeric_of_value(value: &Actual) -> Option<Numeric> {
    match value {
        Actual::Signed(n) => Some(Numeric::Signed(*n)),
        Actual::Unsigned(n) => Some(Numeric::Unsigned(*n)),
        Actual::Float(n) => Some(Numeric::Float(*n)),
        Actual::Boxed(inner) => numeric_of_value(inner),
        _ => None,
    }
}

/// Extract and narrow an actual to a numeric value.
pub fn numeric_of(cx: &mut Check<'_>, actual: &Actual) -> Result<Numeric, Failure> {
    let extracted = must_extract(cx, actual)?;
    numeric_of_value(&extracted).ok_or_else(|| {
        Failure::new(format!(
            "Type of actual '{extracted:?}' does not have a defined comparison function"
        ))
    })
}
