//! Environment-driven duration scaling.
//!
//! Mutates the process environment, so it lives in its own binary with a
//! single test.

use std::time::{Duration, Instant};

use holdfast::prelude::*;
use holdfast::RecordingContext;
use holdfast::timing::SLOW_FACTOR_ENV;

#[test]
fn test_slow_factor_stretches_durations_but_not_intervals() {
    unsafe { std::env::set_var(SLOW_FACTOR_ENV, "2") };

    let cx = RecordingContext::new("t");
    let started = Instant::now();
    // The matcher always passes, so the hold runs out its full (scaled)
    // duration.
    with(&cx)
        .verify(1)
        .will(equal_to(1))
        .hold_for(Duration::from_secs(1), Duration::from_millis(100));
    let elapsed = started.elapsed();

    unsafe { std::env::remove_var(SLOW_FACTOR_ENV) };

    assert!(cx.failures().is_empty(), "failures: {:?}", cx.failures());
    assert!(elapsed >= Duration::from_secs(2), "elapsed: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(10), "elapsed: {elapsed:?}");
}
