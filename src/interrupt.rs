//! Cooperative interruption.
//!
//! The poll loop checks a process-wide flag once per interval and aborts with
//! a dedicated fatal message when it is set. The flag is cooperative only: a
//! tick that is already running finishes naturally.
//!
//! The crate does not install OS signal handlers itself; a harness that wants
//! Ctrl-C to abort pending assertions calls [`request_interruption`] from its
//! own handler.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Request that any pending polling assertion aborts at its next interval.
pub fn request_interruption() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Clear a previously requested interruption.
pub fn clear_interruption() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Whether an interruption has been requested.
#[must_use]
pub fn interruption_requested() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

// The flag is process-global, so exercising it from unit tests would race
// with concurrently running polling tests; see tests/interrupt.rs.
