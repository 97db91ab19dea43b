//! The fluent assertion surface and the evaluation entry points.
//!
//! A caller composes an assertion in four steps and then evaluates it exactly
//! once:
//!
//! ```rust
//! use holdfast::prelude::*;
//! use holdfast::PanicContext;
//!
//! let t = PanicContext::new("example");
//! with(&t).verify(42).will(equal_to(42)).or_fail();
//! ```
//!
//! The two polling entry points, [`Assertion::hold_for`] and
//! [`Assertion::within`], hand control to the poll loop; [`Assertion::or_fail`]
//! evaluates immediately. Evaluating an assertion twice is a programmer error
//! and panics; dropping one that was never evaluated reports a fatal
//! diagnostic.

mod poll;
mod tick;
mod verdict;

pub use verdict::ReportConfig;

use std::sync::Arc;
use std::time::Duration;

use crate::check::Check;
use crate::context::{TestContext, helper_of};
use crate::extract::Actual;
use crate::location::Location;
use crate::matcher::Matcher;
use crate::timing::scale_duration;

use poll::Mode;
use tick::TickOutcome;
use verdict::Reporter;

/// Start a fluent assertion against the given test context.
pub fn with(t: &dyn TestContext) -> Verifier<'_> {
    helper_of(t).mark_helper();
    Verifier {
        t,
        desc: None,
        config: ReportConfig::default(),
    }
}

/// First stage of the fluent chain: optional description, then actuals.
pub struct Verifier<'t> {
    t: &'t dyn TestContext,
    desc: Option<String>,
    config: ReportConfig,
}

impl<'t> Verifier<'t> {
    /// Attach a human-readable description, used as a prefix in failure
    /// reports.
    #[must_use]
    pub fn ensure(mut self, desc: impl Into<String>) -> Self {
        helper_of(self.t).mark_helper();
        self.desc = Some(desc.into());
        self
    }

    /// Override the diagnostic rendering options.
    #[must_use]
    pub fn configured(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Bind a single actual value.
    #[must_use]
    pub fn verify(self, actual: impl Into<Actual>) -> Asserter<'t> {
        let actual = actual.into();
        self.verify_many(vec![actual])
    }

    /// Bind an ordered list of actual values.
    #[must_use]
    pub fn verify_many(self, actuals: Vec<Actual>) -> Asserter<'t> {
        helper_of(self.t).mark_helper();
        Asserter {
            t: self.t,
            desc: self.desc,
            config: self.config,
            actuals,
        }
    }
}

/// Second stage of the fluent chain: bind the matcher.
pub struct Asserter<'t> {
    t: &'t dyn TestContext,
    desc: Option<String>,
    config: ReportConfig,
    actuals: Vec<Actual>,
}

impl<'t> Asserter<'t> {
    /// Bind the matcher, producing an [`Assertion`] ready for evaluation.
    ///
    /// The call site is captured here and cited in failure reports.
    #[must_use]
    #[track_caller]
    pub fn will(self, matcher: impl Matcher + 'static) -> Assertion<'t> {
        helper_of(self.t).mark_helper();
        Assertion {
            t: self.t,
            desc: self.desc,
            config: self.config,
            location: Location::capture(),
            actuals: Arc::new(self.actuals),
            matcher: Arc::new(matcher),
            evaluated: false,
        }
    }
}

/// One evaluation unit: actuals, matcher, description, and call site.
///
/// Must be evaluated exactly once. A second evaluation panics; dropping an
/// assertion that was never evaluated reports a fatal diagnostic through the
/// test context (unless the test already failed).
pub struct Assertion<'t> {
    t: &'t dyn TestContext,
    desc: Option<String>,
    config: ReportConfig,
    location: Location,
    actuals: Arc<Vec<Actual>>,
    matcher: Arc<dyn Matcher>,
    evaluated: bool,
}

impl Assertion<'_> {
    /// Evaluate the matcher once, immediately.
    ///
    /// A structured failure is reported through the test context; any other
    /// unwind from the matcher propagates unchanged.
    #[track_caller]
    pub fn or_fail(&mut self) {
        helper_of(self.t).mark_helper();
        self.mark_evaluated();
        let call_site = Location::capture();

        let outcome = {
            let mut cx = Check::direct(self.t);
            tick::evaluate(self.matcher.as_ref(), &self.actuals, &mut cx)
        };
        match outcome {
            TickOutcome::Succeeded => {}
            TickOutcome::Failed(failure) => {
                self.reporter(&call_site).report_failure(&failure);
            }
            TickOutcome::Faulted(payload) => std::panic::resume_unwind(payload),
        }
    }

    /// Evaluate repeatedly at `interval`; the matcher must pass on every tick
    /// for the whole `duration`.
    #[track_caller]
    pub fn hold_for(&mut self, duration: Duration, interval: Duration) {
        helper_of(self.t).mark_helper();
        self.mark_evaluated();
        let call_site = Location::capture();
        let duration = scale_duration(self.t, duration);

        let verdict = poll::run(
            Mode::HoldFor,
            self.t,
            Arc::clone(&self.matcher),
            Arc::clone(&self.actuals),
            duration,
            interval,
        );
        self.reporter(&call_site).report_poll(verdict, duration);
    }

    /// Evaluate repeatedly at `interval`; the matcher must pass at least once
    /// before `duration` elapses. Interim failures are tolerated.
    #[track_caller]
    pub fn within(&mut self, duration: Duration, interval: Duration) {
        helper_of(self.t).mark_helper();
        self.mark_evaluated();
        let call_site = Location::capture();
        let duration = scale_duration(self.t, duration);

        let verdict = poll::run(
            Mode::SettleWithin,
            self.t,
            Arc::clone(&self.matcher),
            Arc::clone(&self.actuals),
            duration,
            interval,
        );
        self.reporter(&call_site).report_poll(verdict, duration);
    }

    fn mark_evaluated(&mut self) {
        assert!(!self.evaluated, "assertion already evaluated");
        self.evaluated = true;
    }

    fn reporter<'a>(&'a self, call_site: &'a Location) -> Reporter<'a> {
        Reporter::new(
            self.t,
            self.desc.as_deref(),
            self.config,
            &self.location,
            call_site,
        )
    }
}

impl Drop for Assertion<'_> {
    fn drop(&mut self) {
        if !self.evaluated && !std::thread::panicking() && !self.t.failed() {
            self.t.fatal(&format!(
                "An assertion was never evaluated!\n{}",
                self.location.cite(self.config.show_source)
            ));
        }
    }
}
