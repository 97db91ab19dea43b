//! Test context contract consumed by the assertion engine.
//!
//! The engine never talks to a concrete test harness directly; everything it
//! needs from one is captured by [`TestContext`]:
//!
//! - [`TestContext::fatal`] - report a terminal failure
//! - [`TestContext::cleanup`] - register an end-of-test action
//! - [`TestContext::failed`] - whether the test already failed
//! - [`TestContext::log`] - informational output
//!
//! Two implementations ship with the crate: [`PanicContext`], the root context
//! for plain `#[test]` functions, and [`RecordingContext`], which records
//! failures and logs so the engine (and user-written matchers) can be tested
//! without failing the surrounding test.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// A deferred end-of-test action.
pub type CleanupAction = Box<dyn FnOnce() + Send>;

/// The capabilities the assertion engine requires from a test harness.
///
/// `fatal` reports exactly one formatted failure and returns; implementations
/// decide whether that unwinds (as [`PanicContext`] does) or merely records
/// (as [`RecordingContext`] does). The engine never calls it twice for one
/// evaluation.
pub trait TestContext {
    /// The name of the running test.
    fn name(&self) -> &str;

    /// Register an action to run when the test finishes.
    fn cleanup(&self, action: CleanupAction);

    /// Report a terminal failure.
    fn fatal(&self, message: &str);

    /// Whether this test has already failed.
    fn failed(&self) -> bool;

    /// Log an informational message.
    fn log(&self, message: &str);

    /// Optional back-reference to an enclosing context.
    ///
    /// A relation only; the parent owns nothing and is never mutated through
    /// this reference.
    fn parent(&self) -> Option<&dyn TestContext> {
        None
    }

    /// The helper capability of this context, if it has one.
    fn helper(&self) -> Option<&dyn Helper> {
        None
    }
}

/// Capability for marking engine-internal frames as helpers.
///
/// Harnesses that distinguish user frames from library frames in their output
/// implement this; everything else gets the no-op fallback from
/// [`helper_of`].
pub trait Helper {
    /// Mark the calling function as a test helper.
    fn mark_helper(&self);
}

struct NoopHelper;

impl Helper for NoopHelper {
    fn mark_helper(&self) {}
}

static NOOP_HELPER: NoopHelper = NoopHelper;

/// Upper bound on the parent walk in [`helper_of`].
const MAX_PARENT_DEPTH: usize = 32;

/// Resolve the nearest [`Helper`] capability of `t`.
///
/// Walks the parent chain (bounded) and falls back to a no-op helper when no
/// context in the chain provides one.
pub fn helper_of(t: &dyn TestContext) -> &dyn Helper {
    let mut candidate = t;
    for _ in 0..MAX_PARENT_DEPTH {
        if let Some(helper) = candidate.helper() {
            return helper;
        }
        match candidate.parent() {
            Some(parent) => candidate = parent,
            None => break,
        }
    }
    &NOOP_HELPER
}

/// Root context for plain `#[test]` functions.
///
/// `fatal` panics with the formatted report, which is how a failure surfaces
/// in the standard harness. Cleanup actions run in reverse registration order
/// when the context is dropped.
pub struct PanicContext {
    name: String,
    failed: AtomicBool,
    cleanups: Mutex<Vec<CleanupAction>>,
}

impl PanicContext {
    /// Create a root context named after the current test.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failed: AtomicBool::new(false),
            cleanups: Mutex::new(Vec::new()),
        }
    }
}

impl TestContext for PanicContext {
    fn name(&self) -> &str {
        &self.name
    }

    fn cleanup(&self, action: CleanupAction) {
        self.cleanups.lock().push(action);
    }

    fn fatal(&self, message: &str) {
        self.failed.store(true, Ordering::SeqCst);
        panic!("{message}");
    }

    fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    fn log(&self, message: &str) {
        println!("[{}] {message}", self.name);
    }
}

impl Drop for PanicContext {
    fn drop(&mut self) {
        let mut cleanups = std::mem::take(&mut *self.cleanups.lock());
        while let Some(action) = cleanups.pop() {
            if std::panic::catch_unwind(std::panic::AssertUnwindSafe(action)).is_err() {
                eprintln!("[{}] a cleanup action panicked", self.name);
            }
        }
    }
}

/// A context that records failures, logs, and cleanups instead of acting on
/// them.
///
/// Useful for asserting on the engine's own diagnostics, or for testing
/// custom matchers. Holds an optional parent so [`helper_of`] resolution can
/// be exercised through it.
pub struct RecordingContext<'p> {
    name: String,
    parent: Option<&'p dyn TestContext>,
    failures: Mutex<Vec<String>>,
    logs: Mutex<Vec<String>>,
    cleanups: Mutex<Vec<CleanupAction>>,
}

impl std::fmt::Debug for RecordingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingContext")
            .field("name", &self.name)
            .field("failures", &*self.failures.lock())
            .field("logs", &*self.logs.lock())
            .finish_non_exhaustive()
    }
}

impl<'p> RecordingContext<'p> {
    /// Create a recording context with no parent.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            failures: Mutex::new(Vec::new()),
            logs: Mutex::new(Vec::new()),
            cleanups: Mutex::new(Vec::new()),
        }
    }

    /// Create a recording context chained under `parent`.
    #[must_use]
    pub fn with_parent(name: impl Into<String>, parent: &'p dyn TestContext) -> Self {
        let mut cx = Self::new(name);
        cx.parent = Some(parent);
        cx
    }

    /// All failure reports recorded so far.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }

    /// All log lines recorded so far.
    #[must_use]
    pub fn logs(&self) -> Vec<String> {
        self.logs.lock().clone()
    }

    /// Number of registered (not yet run) cleanup actions.
    #[must_use]
    pub fn pending_cleanups(&self) -> usize {
        self.cleanups.lock().len()
    }

    /// Run registered cleanup actions in reverse registration order.
    pub fn run_cleanups(&self) {
        let mut cleanups = std::mem::take(&mut *self.cleanups.lock());
        while let Some(action) = cleanups.pop() {
            action();
        }
    }
}

impl TestContext for RecordingContext<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn cleanup(&self, action: CleanupAction) {
        self.cleanups.lock().push(action);
    }

    fn fatal(&self, message: &str) {
        self.failures.lock().push(message.to_string());
    }

    fn failed(&self) -> bool {
        !self.failures.lock().is_empty()
    }

    fn log(&self, message: &str) {
        self.logs.lock().push(message.to_string());
    }

    fn parent(&self) -> Option<&dyn TestContext> {
        self.parent
    }
}
