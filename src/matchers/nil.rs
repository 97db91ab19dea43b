//! Absence of a value.

use crate::check::{Check, CheckResult};
use crate::extract::{Actual, extract};
use crate::fail;
use crate::matcher::Matcher;

struct BeNil;

impl Matcher for BeNil {
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        for actual in actuals {
            match extract(cx, actual)? {
                None | Some(Actual::Nil) => {}
                Some(value) => {
                    fail!("Expected actual to be nil, but it is not: {value:?}");
                }
            }
        }
        Ok(())
    }
}

/// Require every actual to extract to nothing.
#[must_use]
pub fn be_nil() -> impl Matcher {
    BeNil
}
