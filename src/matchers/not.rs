//! Matcher inversion.

use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

use crate::check::{Check, CheckResult, Failure};
use crate::extract::Actual;
use crate::fail;
use crate::matcher::Matcher;

struct Not<M> {
    inner: M,
}

impl<M: Matcher> Matcher for Not<M> {
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        // A structured failure, whether returned or raised, is the expected
        // outcome; anything else that unwinds is a genuine defect.
        let outcome = catch_unwind(AssertUnwindSafe(|| self.inner.check(cx, actuals)));
        match outcome {
            Ok(Ok(())) => fail!("Expected this matcher to fail, but it did not"),
            Ok(Err(_)) => Ok(()),
            Err(payload) => match payload.downcast::<Failure>() {
                Ok(_) => Ok(()),
                Err(payload) => resume_unwind(payload),
            },
        }
    }
}

/// Invert a matcher: pass when it fails, fail when it passes.
pub fn not(matcher: impl Matcher + 'static) -> impl Matcher {
    Not { inner: matcher }
}
