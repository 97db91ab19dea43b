//! End-to-end behavior of the two polling modes against live operands.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use holdfast::prelude::*;
use holdfast::{Actual, RecordingContext};

fn counting_thunk(counter: &Arc<AtomicI64>) -> Actual {
    let counter = Arc::clone(counter);
    Actual::thunk(move |_cx| Ok(Some(counter.fetch_add(1, Ordering::SeqCst).into())))
}

#[test]
fn test_hold_for_passes_when_the_condition_holds_throughout() {
    let cx = RecordingContext::new("t");
    let ticks = Arc::new(AtomicUsize::new(0));
    let probe = Arc::clone(&ticks);

    with(&cx)
        .verify(7)
        .will(move |cx: &mut Check<'_>, actuals: &[Actual]| -> CheckResult {
            probe.fetch_add(1, Ordering::SeqCst);
            be_less_than(100).check(cx, actuals)
        })
        .hold_for(Duration::from_millis(400), Duration::from_millis(50));

    assert!(cx.failures().is_empty(), "failures: {:?}", cx.failures());
    assert!(ticks.load(Ordering::SeqCst) >= 3);
}

#[test]
fn test_hold_for_breaks_as_soon_as_a_tick_fails() {
    let cx = RecordingContext::new("t");
    let counter = Arc::new(AtomicI64::new(0));
    let started = Instant::now();

    // The counter leaves the allowed range after a few ticks.
    with(&cx)
        .verify(counting_thunk(&counter))
        .will(be_less_than(3_i64))
        .hold_for(Duration::from_secs(30), Duration::from_millis(50));

    assert!(started.elapsed() < Duration::from_secs(10));
    let failures = cx.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("Expected actual value 3 to be less than 3"));
    assert!(failures[0].contains("did not pass repeatedly for 30s"));
}

#[test]
fn test_within_settles_before_the_deadline() {
    let cx = RecordingContext::new("t");
    let counter = Arc::new(AtomicI64::new(0));
    let started = Instant::now();

    with(&cx)
        .verify(counting_thunk(&counter))
        .will(be_greater_than(2_i64))
        .within(Duration::from_secs(30), Duration::from_millis(50));

    assert!(cx.failures().is_empty(), "failures: {:?}", cx.failures());
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_within_reports_the_last_failure_on_timeout() {
    let cx = RecordingContext::new("t");

    with(&cx)
        .verify(5)
        .will(equal_to(6))
        .within(Duration::from_millis(300), Duration::from_millis(50));

    let failures = cx.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("Unexpected difference"));
    assert!(failures[0].contains("waiting for assertion to pass"));
}

#[test]
fn test_deadline_before_any_tick_completes() {
    let cx = RecordingContext::new("t");

    with(&cx)
        .verify(1)
        .will(|_cx: &mut Check<'_>, _a: &[Actual]| -> CheckResult {
            thread::sleep(Duration::from_secs(2));
            Ok(())
        })
        .within(Duration::from_millis(300), Duration::from_millis(50));

    let failures = cx.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("tick never finished once"));
}

#[test]
fn test_hold_for_deadline_before_any_tick_completes() {
    let cx = RecordingContext::new("t");

    with(&cx)
        .verify(1)
        .will(|_cx: &mut Check<'_>, _a: &[Actual]| -> CheckResult {
            thread::sleep(Duration::from_secs(2));
            Ok(())
        })
        .hold_for(Duration::from_millis(300), Duration::from_millis(50));

    let failures = cx.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("tick never finished once"));
}

#[test]
fn test_cleanups_flush_after_every_tick() {
    let cx = RecordingContext::new("t");
    let ticks = Arc::new(AtomicUsize::new(0));
    let flushed = Arc::new(AtomicUsize::new(0));
    let tick_probe = Arc::clone(&ticks);
    let flush_probe = Arc::clone(&flushed);

    with(&cx)
        .verify(1)
        .will(move |cx: &mut Check<'_>, _a: &[Actual]| -> CheckResult {
            tick_probe.fetch_add(1, Ordering::SeqCst);
            let flushed = Arc::clone(&flush_probe);
            cx.cleanup(move || {
                flushed.fetch_add(1, Ordering::SeqCst);
            });
            Ok(())
        })
        .hold_for(Duration::from_millis(400), Duration::from_millis(50));

    assert!(cx.failures().is_empty());
    // One flush per completed tick, not one at the end of the run.
    assert_eq!(
        flushed.load(Ordering::SeqCst),
        ticks.load(Ordering::SeqCst)
    );
    assert!(ticks.load(Ordering::SeqCst) >= 2);
}

#[test]
fn test_channel_operands_are_reread_each_tick() {
    let cx = RecordingContext::new("t");
    let (tx, rx) = mpsc::channel();
    for value in [1_i64, 2, 100] {
        tx.send(Actual::Signed(value)).unwrap();
    }

    // The first two received values fail the matcher; the third settles it.
    with(&cx)
        .verify(Actual::channel(rx))
        .will(be_greater_than(50_i64))
        .within(Duration::from_secs(30), Duration::from_millis(50));

    assert!(cx.failures().is_empty(), "failures: {:?}", cx.failures());
}

#[test]
fn test_slow_matcher_skips_intervals_instead_of_stacking() {
    let cx = RecordingContext::new("t");
    let invocations = Arc::new(AtomicUsize::new(0));
    let probe = Arc::clone(&invocations);

    with(&cx)
        .verify(1)
        .will(move |_cx: &mut Check<'_>, _a: &[Actual]| -> CheckResult {
            probe.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(120));
            Ok(())
        })
        .hold_for(Duration::from_millis(500), Duration::from_millis(30));

    assert!(cx.failures().is_empty());
    // Sixteen intervals fit in the duration; an in-flight tick absorbs the
    // ones it overlaps.
    assert!(invocations.load(Ordering::SeqCst) <= 5);
}

#[test]
fn test_interim_logs_surface_through_the_context() {
    let cx = RecordingContext::new("t");
    let counter = Arc::new(AtomicI64::new(0));
    let probe = Arc::clone(&counter);

    with(&cx)
        .verify(1)
        .will(move |cx: &mut Check<'_>, _a: &[Actual]| -> CheckResult {
            let n = probe.fetch_add(1, Ordering::SeqCst);
            cx.log(format!("tick {n}"));
            if n < 2 {
                fail!("not yet");
            }
            Ok(())
        })
        .within(Duration::from_secs(30), Duration::from_millis(50));

    assert!(cx.failures().is_empty());
    assert!(cx.logs().iter().any(|l| l == "tick 0"));
    assert!(cx.logs().iter().any(|l| l == "tick 2"));
}
