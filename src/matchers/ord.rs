//! Ordering comparisons over numeric actuals.
//!
//! Bounds are validated at construction: passing a non-numeric bound is a
//! programmer error and panics immediately. At evaluation time the actual
//! must be numeric and of the same shape as the bound; a shape mismatch is a
//! regular matcher failure.

use std::cmp::Ordering;

use crate::check::{Check, CheckResult, Failure};
use crate::extract::Actual;
use crate::fail;
use crate::matcher::Matcher;
use crate::numeric::{Numeric, numeric_of, numeric_of_value};

/// Matches numeric actuals strictly greater than `min`.
pub struct BeGreaterThan {
    min: Numeric,
}

impl Matcher for BeGreaterThan {
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        for actual in actuals {
            let value = numeric_of(cx, actual)?;
            if compare(&value, &self.min)? != Ordering::Greater {
                fail!(
                    "Expected actual value {value} to be greater than {}",
                    self.min
                );
            }
        }
        Ok(())
    }
}

/// Matches numeric actuals strictly less than `max`.
pub struct BeLessThan {
    max: Numeric,
}

impl Matcher for BeLessThan {
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        for actual in actuals {
            let value = numeric_of(cx, actual)?;
            if compare(&value, &self.max)? != Ordering::Less {
                fail!("Expected actual value {value} to be less than {}", self.max);
            }
        }
        Ok(())
    }
}

/// Matches numeric actuals within `[min, max]`, inclusive on both ends.
pub struct BeBetween {
    min: Numeric,
    max: Numeric,
}

impl Matcher for BeBetween {
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        for actual in actuals {
            let value = numeric_of(cx, actual)?;
            if compare(&value, &self.min)? == Ordering::Less
                || compare(&value, &self.max)? == Ordering::Greater
            {
                fail!(
                    "Expected actual value {value} to be between {} and {}",
                    self.min,
                    self.max
                );
            }
        }
        Ok(())
    }
}

/// Require actuals strictly greater than `min`.
///
/// # Panics
///
/// Panics when `min` is not numeric.
pub fn be_greater_than(min: impl Into<Actual>) -> BeGreaterThan {
    BeGreaterThan {
        min: require_numeric(&min.into(), "minimum"),
    }
}

/// Require actuals strictly less than `max`.
///
/// # Panics
///
/// Panics when `max` is not numeric.
pub fn be_less_than(max: impl Into<Actual>) -> BeLessThan {
    BeLessThan {
        max: require_numeric(&max.into(), "maximum"),
    }
}

/// Require actuals within `[min, max]`, inclusive.
///
/// # Panics
///
/// Panics when either bound is not numeric.
pub fn be_between(min: impl Into<Actual>, max: impl Into<Actual>) -> BeBetween {
    BeBetween {
        min: require_numeric(&min.into(), "minimum"),
        max: require_numeric(&max.into(), "maximum"),
    }
}

fn require_numeric(bound: &Actual, what: &str) -> Numeric {
    match numeric_of_value(bound) {
        Some(numeric) => numeric,
        None => panic!("expected a numeric {what} value, got: {bound:?}"),
    }
}

fn compare(value: &Numeric, bound: &Numeric) -> Result<Ordering, Failure> {
    value.compare(bound).ok_or_else(|| {
        Failure::new(format!(
            "Expected actual value to be of type '{}', but it is of type '{}'",
            bound.shape(),
            value.shape()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::TickShared;

    fn check_with(matcher: &dyn Matcher, actual: Actual) -> CheckResult {
        let shared = TickShared::default();
        let mut cx = Check::contained(&shared);
        matcher.check(&mut cx, &[actual])
    }

    #[test]
    fn test_greater_than() {
        assert!(check_with(&be_greater_than(5), Actual::Signed(6)).is_ok());
        let err = check_with(&be_greater_than(5), Actual::Signed(5)).unwrap_err();
        assert_eq!(err.message(), "Expected actual value 5 to be greater than 5");
    }

    #[test]
    fn test_less_than() {
        assert!(check_with(&be_less_than(5), Actual::Signed(4)).is_ok());
        let err = check_with(&be_less_than(0.1), Actual::Float(5.1)).unwrap_err();
        assert_eq!(err.message(), "Expected actual value 5.1 to be less than 0.1");
    }

    #[test]
    fn test_between_is_inclusive() {
        assert!(check_with(&be_between(6, 9), Actual::Signed(6)).is_ok());
        assert!(check_with(&be_between(6, 9), Actual::Signed(9)).is_ok());
        let err = check_with(&be_between(6, 9), Actual::Signed(5)).unwrap_err();
        assert_eq!(
            err.message(),
            "Expected actual value 5 to be between 6 and 9"
        );
        let err = check_with(&be_between(0, 9), Actual::Signed(10)).unwrap_err();
        assert_eq!(
            err.message(),
            "Expected actual value 10 to be between 0 and 9"
        );
    }

    #[test]
    fn test_shape_mismatch_is_a_failure() {
        let err = check_with(&be_greater_than(5_i64), Actual::Unsigned(6)).unwrap_err();
        assert_eq!(
            err.message(),
            "Expected actual value to be of type 'signed integer', but it is of type 'unsigned integer'"
        );
    }

    #[test]
    fn test_non_numeric_actual_is_a_failure() {
        let err = check_with(&be_greater_than(5), Actual::Text("abc".into())).unwrap_err();
        assert!(
            err.message()
                .contains("does not have a defined comparison function")
        );
    }

    #[test]
    fn test_extracts_through_thunks() {
        let actual = Actual::thunk(|_cx| Ok(Some(Actual::Signed(7))));
        assert!(check_with(&be_greater_than(5), actual).is_ok());
    }

    #[test]
    #[should_panic(expected = "expected a numeric minimum value")]
    fn test_non_numeric_bound_panics() {
        let _ = be_greater_than("five");
    }
}
