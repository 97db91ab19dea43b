//! Emptiness of text, byte, and list actuals.

use crate::check::{Check, CheckResult};
use crate::extract::{Actual, extract};
use crate::fail;
use crate::matcher::Matcher;

struct BeEmpty;

impl Matcher for BeEmpty {
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        for actual in actuals {
            // A channel or callable that produces nothing is empty.
            let Some(value) = extract(cx, actual)? else {
                continue;
            };
            let length = match &value {
                Actual::Nil => 0,
                Actual::Text(s) => s.len(),
                Actual::Bytes(b) => b.len(),
                Actual::List(items) => items.len(),
                other => {
                    fail!("Type of actual '{other:?}' does not have a defined length");
                }
            };
            if length != 0 {
                fail!("Expected '{value:?}' to be empty, but it is not (has a length of {length})");
            }
        }
        Ok(())
    }
}

/// Require every actual to be empty (or to produce no value at all).
#[must_use]
pub fn be_empty() -> impl Matcher {
    BeEmpty
}
