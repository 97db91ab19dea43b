//! The matcher-facing evaluation context and the structured failure signal.
//!
//! A matcher receives a [`Check`] and returns a [`CheckResult`]: `Ok(())`
//! when the checked condition holds, `Err(Failure)` when it does not. The
//! [`fail!`] macro builds and early-returns a [`Failure`] in one step.
//!
//! During polling, a `Check` is *contained*: cleanups land in the current
//! tick's stack and log lines are buffered for the scheduling thread. Outside
//! polling it is *direct*: cleanups register with the test context for
//! end-of-test and logs flow through immediately.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use thiserror::Error;

use crate::context::TestContext;

/// A matcher's verdict for one invocation.
pub type CheckResult = Result<(), Failure>;

/// A deferred action scoped to one tick (or, outside polling, to the test).
pub type CleanupFn = Box<dyn FnOnce() + Send>;

/// The structured "this check failed" signal.
///
/// Carries a message; recoverable by retry in the polling modes. Distinct
/// from an opaque fault (any other panic), which is never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    message: String,
}

impl Failure {
    /// Create a failure carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Abort the current tick immediately with this failure.
    ///
    /// For helper code deep inside a matcher where returning a `Result` is
    /// impractical. The tick executor recognizes the payload and records a
    /// normal failure; cleanups for the tick still run.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self)
    }
}

/// Build a [`Failure`] from format arguments and return it as `Err`.
///
/// # Example
///
/// ```rust,ignore
/// fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
///     if actuals.is_empty() {
///         fail!("expected at least one actual value");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! fail {
    ($($arg:tt)*) => {
        return Err($crate::Failure::new(format!($($arg)*)))
    };
}

/// State shared between one tick and the scheduling thread.
///
/// The cleanup list belongs exclusively to the currently running tick; the
/// log buffer is drained by the scheduler between events.
#[derive(Default)]
pub(crate) struct TickShared {
    pub(crate) cleanups: Mutex<Vec<CleanupFn>>,
    pub(crate) logs: Mutex<Vec<String>>,
    pub(crate) failed: AtomicBool,
}

enum Sink<'a> {
    /// Outside polling: forward everything to the test context.
    Direct(&'a dyn TestContext),
    /// Inside a tick: capture locally, surface via the poll loop.
    Contained(&'a TickShared),
}

/// The context handed to a matcher for one invocation.
pub struct Check<'a> {
    sink: Sink<'a>,
}

impl<'a> Check<'a> {
    pub(crate) fn direct(t: &'a dyn TestContext) -> Self {
        Self {
            sink: Sink::Direct(t),
        }
    }

    pub(crate) fn contained(shared: &'a TickShared) -> Self {
        Self {
            sink: Sink::Contained(shared),
        }
    }

    /// Register a deferred action.
    ///
    /// During polling the action joins the current tick's cleanup stack and
    /// runs (in reverse registration order) when the tick ends. Outside
    /// polling it registers with the test context for end-of-test.
    pub fn cleanup(&self, action: impl FnOnce() + Send + 'static) {
        match &self.sink {
            Sink::Direct(t) => t.cleanup(Box::new(action)),
            Sink::Contained(shared) => shared.cleanups.lock().push(Box::new(action)),
        }
    }

    /// Log an informational message.
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        match &self.sink {
            Sink::Direct(t) => t.log(&message),
            Sink::Contained(shared) => shared.logs.lock().push(message),
        }
    }

    /// Whether the evaluation has already recorded a failure.
    #[must_use]
    pub fn failed(&self) -> bool {
        match &self.sink {
            Sink::Direct(t) => t.failed(),
            Sink::Contained(shared) => shared.failed.load(Ordering::SeqCst),
        }
    }
}
