//! The matcher contract.
//!
//! A matcher is one single-shot predicate over the assertion's actual values.
//! It either accepts them (`Ok(())`) or rejects them with a [`Failure`]
//! message. Matchers must be `Send + Sync` because the polling modes invoke
//! them from a tick thread.

use crate::check::{Check, CheckResult};
use crate::extract::Actual;

/// A predicate over the actual values of one assertion.
///
/// # Implementing custom matchers
///
/// ```rust
/// use holdfast::{Actual, Check, CheckResult, Matcher, fail};
///
/// struct IsEven;
///
/// impl Matcher for IsEven {
///     fn check(&self, _cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
///         for actual in actuals {
///             if let Actual::Signed(n) = actual {
///                 if n % 2 != 0 {
///                     fail!("{n} is not even");
///                 }
///             }
///         }
///         Ok(())
///     }
/// }
/// ```
///
/// Closures of the right shape are matchers too:
///
/// ```rust
/// use holdfast::{Actual, Check, CheckResult};
///
/// let matcher = |_cx: &mut Check<'_>, actuals: &[Actual]| -> CheckResult {
///     assert!(!actuals.is_empty());
///     Ok(())
/// };
/// ```
pub trait Matcher: Send + Sync {
    /// Check the actual values once.
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult;
}

impl<F> Matcher for F
where
    F: Fn(&mut Check<'_>, &[Actual]) -> CheckResult + Send + Sync,
{
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        self(cx, actuals)
    }
}
