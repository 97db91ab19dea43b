//! The poll loop: interval-driven ticks raced against a wall-clock deadline.
//!
//! One loop runs per `hold_for`/`within` call, on the calling thread. It owns
//! the deadline and the interval schedule, launches at most one tick thread
//! at a time, and produces the final [`PollVerdict`] exactly once. A slow
//! matcher silently absorbs missed intervals; the loop never stacks
//! concurrent ticks and never cancels a running one.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use crate::assertion::tick::{self, PollState, TickTask};
use crate::assertion::verdict::PollVerdict;
use crate::context::TestContext;
use crate::extract::Actual;
use crate::interrupt::interruption_requested;
use crate::matcher::Matcher;

/// Evaluation mode of one polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// The matcher must pass on every tick for the whole duration.
    HoldFor,
    /// The matcher must pass at least once before the deadline.
    SettleWithin,
}

/// Quantum for the busy-wait on an in-flight tick's cleanup before a verdict
/// is finalized. A tunable constant, not a timing guarantee.
pub(crate) const CLEANUP_WAIT_QUANTUM: Duration = Duration::from_millis(50);

/// Run the polling state machine to completion.
///
/// Opaque faults recorded by a tick are re-raised here, on the calling
/// thread, after that tick's cleanup has flushed; they bypass the verdict.
pub(crate) fn run(
    mode: Mode,
    t: &dyn TestContext,
    matcher: Arc<dyn Matcher>,
    actuals: Arc<Vec<Actual>>,
    duration: Duration,
    interval: Duration,
) -> PollVerdict {
    let state = Arc::new(PollState::default());
    let task = Arc::new(TickTask {
        matcher,
        actuals,
        state: Arc::clone(&state),
    });

    let started = Instant::now();
    let deadline = started + duration;
    let mut next_tick = started + interval;

    loop {
        if deadline <= next_tick {
            // The deadline fires before the next interval would.
            sleep_until(deadline);
            wait_for_cleanup(&state);
            drain_logs(t, &state);
            propagate_fault(&state);
            tracing::trace!(mode = ?mode, "deadline fired, finalizing");
            return finalize_at_deadline(mode, &state, started);
        }

        sleep_until(next_tick);
        next_tick += interval;
        // Missed intervals are skipped, not replayed.
        let now = Instant::now();
        if next_tick < now {
            next_tick = now + interval;
        }

        drain_logs(t, &state);

        // Interruption takes priority over normal scheduling.
        if interruption_requested() {
            tracing::debug!("interruption observed between intervals");
            return PollVerdict::Interrupted;
        }

        propagate_fault(&state);

        match mode {
            Mode::HoldFor => {
                if let Some(failure) = state.take_failure() {
                    // The holding property is broken; no need to wait out the
                    // full duration.
                    wait_for_cleanup(&state);
                    drain_logs(t, &state);
                    return PollVerdict::HoldBroken {
                        failure,
                        elapsed: started.elapsed(),
                    };
                }
                maybe_launch_tick(t, &state, &task);
            }
            Mode::SettleWithin => {
                if state.succeeded.load(Ordering::SeqCst)
                    && !state.ticking.load(Ordering::SeqCst)
                {
                    // Settled before the deadline; terminate early.
                    wait_for_cleanup(&state);
                    drain_logs(t, &state);
                    return PollVerdict::Pass;
                }
                maybe_launch_tick(t, &state, &task);
            }
        }
    }
}

fn finalize_at_deadline(mode: Mode, state: &PollState, started: Instant) -> PollVerdict {
    let succeeded = state.succeeded.load(Ordering::SeqCst);
    match mode {
        Mode::HoldFor => {
            if let Some(failure) = state.take_failure() {
                PollVerdict::HoldFailedAtDeadline { failure }
            } else if succeeded {
                PollVerdict::Pass
            } else {
                PollVerdict::NeverTicked
            }
        }
        Mode::SettleWithin => {
            if succeeded {
                PollVerdict::Pass
            } else if let Some(failure) = state.take_failure() {
                PollVerdict::SettleTimedOut {
                    failure,
                    elapsed: started.elapsed(),
                }
            } else {
                PollVerdict::NeverTicked
            }
        }
    }
}

/// Launch a tick unless one is already in flight.
fn maybe_launch_tick(t: &dyn TestContext, state: &Arc<PollState>, task: &Arc<TickTask>) {
    if state.ticking.load(Ordering::SeqCst) {
        tracing::trace!("tick still in flight, skipping this interval");
        return;
    }
    state.ticking.store(true, Ordering::SeqCst);
    let task = Arc::clone(task);
    let spawned = thread::Builder::new()
        .name("holdfast-tick".to_string())
        .spawn(move || tick::run_tick(&task));
    if let Err(err) = spawned {
        state.ticking.store(false, Ordering::SeqCst);
        t.log(&format!("failed to spawn tick thread: {err}"));
    }
}

/// Busy-wait until the in-flight tick's cleanup has finished. The loop never
/// reports a verdict while cleanup is mid-flight.
fn wait_for_cleanup(state: &PollState) {
    while state.cleaning_up.load(Ordering::SeqCst) {
        thread::sleep(CLEANUP_WAIT_QUANTUM);
    }
}

/// Re-raise an opaque fault recorded by a tick. Its cleanup already flushed
/// before the fault was published.
fn propagate_fault(state: &PollState) {
    if let Some(payload) = state.take_fault() {
        std::panic::resume_unwind(payload);
    }
}

/// Forward log lines buffered by ticks to the test context.
///
/// A tick still in flight when the verdict lands may buffer lines after the
/// final drain; those are dropped with the state, since the loop never waits
/// for a running matcher body.
fn drain_logs(t: &dyn TestContext, state: &PollState) {
    let lines: Vec<String> = state.shared.logs.lock().drain(..).collect();
    for line in &lines {
        t.log(line);
    }
}

fn sleep_until(target: Instant) {
    let now = Instant::now();
    if target > now {
        thread::sleep(target - now);
    }
}
