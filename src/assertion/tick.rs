//! Tick execution: one matcher invocation in isolation.
//!
//! A tick runs the matcher once, classifies how it ended, flushes the tick's
//! cleanup stack, and publishes the outcome. This is the only place the
//! matcher is invoked in the polling modes, and the only seam in the crate
//! that catches unwinds.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::check::{Check, Failure, TickShared};
use crate::extract::Actual;
use crate::matcher::Matcher;

/// How one tick ended.
pub(crate) enum TickOutcome {
    /// The matcher accepted the actuals.
    Succeeded,
    /// The matcher rejected the actuals with a structured failure.
    Failed(Failure),
    /// The matcher unwound with something that is not a structured failure.
    /// The payload must be re-raised unchanged; it is never retried.
    Faulted(Box<dyn Any + Send>),
}

/// Classify an abnormal unwind from matcher code.
///
/// A [`Failure`] payload (raised via [`Failure::raise`]) is the structured
/// failure signal; anything else is an opaque fault that must propagate.
pub(crate) fn classify(payload: Box<dyn Any + Send>) -> TickOutcome {
    match payload.downcast::<Failure>() {
        Ok(failure) => TickOutcome::Failed(*failure),
        Err(payload) => TickOutcome::Faulted(payload),
    }
}

/// Run the matcher once and classify the result.
///
/// Does not touch cleanups; callers own the flush policy (the polling
/// executor flushes per tick, the immediate mode leaves cleanups registered
/// with the test context).
pub(crate) fn evaluate(
    matcher: &dyn Matcher,
    actuals: &[Actual],
    cx: &mut Check<'_>,
) -> TickOutcome {
    match catch_unwind(AssertUnwindSafe(|| matcher.check(cx, actuals))) {
        Ok(Ok(())) => TickOutcome::Succeeded,
        Ok(Err(failure)) => TickOutcome::Failed(failure),
        Err(payload) => classify(payload),
    }
}

/// Working state of one `hold_for`/`within` run, shared between the
/// scheduling thread and the tick thread.
#[derive(Default)]
pub(crate) struct PollState {
    pub(crate) shared: TickShared,
    /// Whether a tick is currently in flight. Set by the scheduler before
    /// launching; cleared by the tick thread after its outcome is published.
    pub(crate) ticking: AtomicBool,
    /// Whether the in-flight tick is mid-cleanup. The loop never reports a
    /// verdict while this is set.
    pub(crate) cleaning_up: AtomicBool,
    /// Whether any tick has ever succeeded.
    pub(crate) succeeded: AtomicBool,
    /// The most recent structured failure.
    pub(crate) failure: Mutex<Option<Failure>>,
    /// An opaque fault pending re-raise on the scheduling thread.
    pub(crate) fault: Mutex<Option<Box<dyn Any + Send>>>,
}

impl PollState {
    pub(crate) fn take_failure(&self) -> Option<Failure> {
        self.failure.lock().take()
    }

    pub(crate) fn take_fault(&self) -> Option<Box<dyn Any + Send>> {
        self.fault.lock().take()
    }
}

/// Everything a tick thread needs.
pub(crate) struct TickTask {
    pub(crate) matcher: Arc<dyn Matcher>,
    pub(crate) actuals: Arc<Vec<Actual>>,
    pub(crate) state: Arc<PollState>,
}

/// Execute one tick: reset cleanups, run the matcher, flush cleanups, publish
/// the outcome, and only then mark the tick finished.
pub(crate) fn run_tick(task: &TickTask) {
    let state = &task.state;
    state.shared.cleanups.lock().clear();

    let outcome = {
        let mut cx = Check::contained(&state.shared);
        evaluate(task.matcher.as_ref(), &task.actuals, &mut cx)
    };

    // The outcome was captured above; cleanups run before it is published.
    state.cleaning_up.store(true, Ordering::SeqCst);
    flush_cleanups(&state.shared);
    state.cleaning_up.store(false, Ordering::SeqCst);

    match outcome {
        TickOutcome::Succeeded => state.succeeded.store(true, Ordering::SeqCst),
        TickOutcome::Failed(failure) => {
            state.shared.failed.store(true, Ordering::SeqCst);
            *state.failure.lock() = Some(failure);
        }
        TickOutcome::Faulted(payload) => *state.fault.lock() = Some(payload),
    }

    state.ticking.store(false, Ordering::SeqCst);
}

/// Flush the cleanup stack: last registered runs first, unconditionally, and
/// the list ends up empty. An entry that panics is logged and the remaining
/// entries still run; cleanup outcomes never affect the tick's verdict.
pub(crate) fn flush_cleanups(shared: &TickShared) {
    loop {
        let action = shared.cleanups.lock().pop();
        let Some(action) = action else { break };
        if let Err(payload) = catch_unwind(AssertUnwindSafe(action)) {
            shared.logs.lock().push(format!(
                "cleanup action panicked: {}",
                panic_message(payload.as_ref())
            ));
        }
    }
}

/// Best-effort rendering of a panic payload for log lines.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
