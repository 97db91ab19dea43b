//! Final verdict formatting and reporting.
//!
//! Converts the poll loop's final state into either a silent return or a
//! single formatted fatal report: optional description prefix, the diagnostic
//! clause for the verdict, and one or two source citations. The reporter is
//! called at most once per evaluation.

use std::time::Duration;

use crate::check::Failure;
use crate::context::TestContext;
use crate::location::Location;

/// Diagnostic rendering options, passed explicitly to the reporter.
#[derive(Debug, Clone, Copy)]
pub struct ReportConfig {
    /// Include the source snippet in `file:line --> source` citations.
    pub show_source: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { show_source: true }
    }
}

/// The final state of one `hold_for`/`within` run.
#[derive(Debug)]
pub(crate) enum PollVerdict {
    /// The assertion held (or settled); nothing to report.
    Pass,
    /// An external interruption was observed between intervals.
    Interrupted,
    /// Hold-for: a tick failed before the duration elapsed.
    HoldBroken { failure: Failure, elapsed: Duration },
    /// Hold-for: the deadline fired with a failure as the latest state.
    HoldFailedAtDeadline { failure: Failure },
    /// The deadline fired and no tick ever completed.
    NeverTicked,
    /// Settle-within: the deadline fired without any success.
    SettleTimedOut { failure: Failure, elapsed: Duration },
}

/// One-shot reporter bound to a single assertion evaluation.
pub(crate) struct Reporter<'a> {
    t: &'a dyn TestContext,
    desc: Option<&'a str>,
    config: ReportConfig,
    assertion_site: &'a Location,
    call_site: &'a Location,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(
        t: &'a dyn TestContext,
        desc: Option<&'a str>,
        config: ReportConfig,
        assertion_site: &'a Location,
        call_site: &'a Location,
    ) -> Self {
        Self {
            t,
            desc,
            config,
            assertion_site,
            call_site,
        }
    }

    /// Report the final poll verdict. Success is silent.
    pub(crate) fn report_poll(&self, verdict: PollVerdict, duration: Duration) {
        match verdict {
            PollVerdict::Pass => {}
            PollVerdict::Interrupted => {
                self.fail_now("Process has been canceled via an interruption request".to_string());
            }
            PollVerdict::NeverTicked => {
                self.fail_now(format!(
                    "Timed out after {} waiting for assertion to pass (tick never finished once)",
                    fmt_duration(duration)
                ));
            }
            PollVerdict::HoldBroken { failure, elapsed } => {
                self.fail_now(format!(
                    "{failure}\nAssertion failed after {} and did not pass repeatedly for {}",
                    fmt_duration(elapsed),
                    fmt_duration(duration)
                ));
            }
            PollVerdict::HoldFailedAtDeadline { failure } => {
                self.fail_now(format!(
                    "{failure}\nAssertion failed while waiting for {}",
                    fmt_duration(duration)
                ));
            }
            PollVerdict::SettleTimedOut { failure, elapsed } => {
                self.fail_now(format!(
                    "{failure}\nTimed out after {} waiting for assertion to pass",
                    fmt_duration(elapsed)
                ));
            }
        }
    }

    /// Report an immediate-mode failure.
    pub(crate) fn report_failure(&self, failure: &Failure) {
        self.fail_now(failure.message().to_string());
    }

    fn fail_now(&self, message: String) {
        let mut message = match self.desc {
            Some(desc) if !desc.is_empty() => {
                format!("{desc} failed: {}", lower_first(&message))
            }
            _ => message,
        };

        // Cite the evaluation call site when it differs from the site where
        // the matcher was bound, then always cite the assertion itself.
        if !self.call_site.same_site(self.assertion_site) {
            message.push('\n');
            message.push_str(&self.call_site.cite(self.config.show_source));
        }
        message.push('\n');
        message.push_str(&self.assertion_site.cite(self.config.show_source));

        self.t.fatal(&message);
    }
}

/// Render a duration the way it was configured ("1s", "1.5s", "100ms").
pub(crate) fn fmt_duration(duration: Duration) -> String {
    format!("{duration:?}")
}

fn lower_first(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
