//! Success and failure of operations under test.
//!
//! Both matchers look at the last actual value, which is where
//! [`Actual::from_result`] places the error of a fallible operation.

use crate::check::{Check, CheckResult};
use crate::extract::{Actual, extract};
use crate::fail as fail_now;
use crate::matcher::Matcher;

struct Succeed;

impl Matcher for Succeed {
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        let mut resolved = Vec::with_capacity(actuals.len());
        for actual in actuals {
            if let Some(value) = extract(cx, actual)? {
                resolved.push(value);
            }
        }
        if let Some(Actual::Fault(error)) = resolved.last() {
            fail_now!("Error occurred: {error}");
        }
        Ok(())
    }
}

struct Fail;

impl Matcher for Fail {
    fn check(&self, _cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        // The error value is inspected as-is; no extraction, so a channel or
        // callable in error position is not an error.
        match actuals.last() {
            Some(Actual::Fault(_)) => Ok(()),
            _ => fail_now!("No error occurred"),
        }
    }
}

/// Require that no actual resolves to an error value.
#[must_use]
pub fn succeed() -> impl Matcher {
    Succeed
}

/// Require the last actual to be an error value.
#[must_use]
pub fn fail() -> impl Matcher {
    Fail
}
