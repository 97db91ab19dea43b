//! Pairwise equality.

use std::sync::Arc;

use crate::check::{Check, CheckResult};
use crate::extract::Actual;
use crate::fail;
use crate::matcher::Matcher;

/// A pluggable comparison strategy for [`EqualTo`].
pub type Comparator = dyn Fn(&mut Check<'_>, &Actual, &Actual) -> CheckResult + Send + Sync;

/// Matches when every actual value equals its positional expected value.
pub struct EqualTo {
    expected: Vec<Actual>,
    comparator: Arc<Comparator>,
}

impl EqualTo {
    /// Replace the default comparison with a custom one.
    ///
    /// The comparator receives one expected/actual pair per call and reports
    /// a mismatch by returning a failure.
    #[must_use]
    pub fn using(
        mut self,
        comparator: impl Fn(&mut Check<'_>, &Actual, &Actual) -> CheckResult + Send + Sync + 'static,
    ) -> Self {
        self.comparator = Arc::new(comparator);
        self
    }
}

impl Matcher for EqualTo {
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        if self.expected.len() != actuals.len() {
            fail!(
                "Unexpected difference: received {} actual values and {} expected values",
                actuals.len(),
                self.expected.len()
            );
        }
        for (expected, actual) in self.expected.iter().zip(actuals) {
            (self.comparator)(cx, expected, actual)?;
        }
        Ok(())
    }
}

/// Match a single actual value against `expected`.
pub fn equal_to(expected: impl Into<Actual>) -> EqualTo {
    equal_to_all(vec![expected.into()])
}

/// Match each actual value against the expected value at the same position.
#[must_use]
pub fn equal_to_all(expected: Vec<Actual>) -> EqualTo {
    EqualTo {
        expected,
        comparator: Arc::new(default_compare),
    }
}

fn default_compare(_cx: &mut Check<'_>, expected: &Actual, actual: &Actual) -> CheckResult {
    if expected == actual {
        Ok(())
    } else {
        fail!(
            "Unexpected difference (\"-\" lines are expected values; \"+\" lines are actual values):\n- {expected:?}\n+ {actual:?}"
        );
    }
}
