//! Timing behaviour of debounced functions
//!
//! Runs on the virtual clock, so every assertion is about exact
//! millisecond offsets.

use fos_debounce::{
    Callback, Debounce, DebounceMode, Error, HandleEvent, LocalTimers, TimerHost, VirtualClock,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

type Firings = Rc<RefCell<Vec<(u64, &'static str)>>>;

/// Debounced recorder: every firing logs (clock ms, argument)
fn recorder(clock: &Rc<VirtualClock>, delay_ms: u64, mode: DebounceMode) -> (Debounce<&'static str>, Firings) {
    let firings: Firings = Rc::new(RefCell::new(Vec::new()));
    let log = firings.clone();
    let at = clock.clone();
    let debounce = Debounce::new(
        clock.clone(),
        Callback::sync(move |arg: &'static str| log.borrow_mut().push((at.now().as_millis() as u64, arg))),
        Duration::from_millis(delay_ms),
        mode,
    );
    (debounce, firings)
}

/// Invoke at absolute offsets (ms)
fn invoke_at(clock: &VirtualClock, debounce: &Debounce<&'static str>, calls: &[(u64, &'static str)]) {
    for &(at, arg) in calls {
        clock.advance_to(Duration::from_millis(at));
        debounce.invoke(arg);
    }
}

// ============================================================================
// TIMEOUT
// ============================================================================

#[test]
fn test_timeout_burst_fires_once_with_last_args() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 100, DebounceMode::Timeout);

    invoke_at(&clock, &debounce, &[(0, "a"), (30, "b"), (60, "c"), (90, "d")]);

    clock.advance_to(Duration::from_millis(189));
    assert!(firings.borrow().is_empty());

    clock.advance_to(Duration::from_millis(400));
    assert_eq!(*firings.borrow(), vec![(190, "d")]);
}

#[test]
fn test_timeout_separate_bursts() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 50, DebounceMode::Timeout);

    invoke_at(&clock, &debounce, &[(0, "a"), (20, "b"), (200, "c")]);
    clock.advance_to(Duration::from_millis(500));

    assert_eq!(*firings.borrow(), vec![(70, "b"), (250, "c")]);
}

// ============================================================================
// IMMEDIATE AND TIMEOUT
// ============================================================================

#[test]
fn test_immediate_and_timeout_leading_then_trailing() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 100, DebounceMode::ImmediateAndTimeout);

    debounce.invoke("a");
    assert_eq!(*firings.borrow(), vec![(0, "a")]);

    invoke_at(&clock, &debounce, &[(50, "b"), (80, "c")]);
    clock.advance_to(Duration::from_millis(300));
    assert_eq!(*firings.borrow(), vec![(0, "a"), (180, "c")]);
}

#[test]
fn test_immediate_and_timeout_after_gap_fires_immediately() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 100, DebounceMode::ImmediateAndTimeout);

    invoke_at(&clock, &debounce, &[(0, "a"), (400, "b")]);
    assert_eq!(*firings.borrow(), vec![(0, "a"), (400, "b")]);

    invoke_at(&clock, &debounce, &[(420, "c"), (450, "d"), (480, "e")]);
    clock.advance_to(Duration::from_millis(1000));
    assert_eq!(*firings.borrow(), vec![(0, "a"), (400, "b"), (580, "e")]);
}

#[test]
fn test_immediate_and_timeout_gap_must_exceed_delay() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 100, DebounceMode::ImmediateAndTimeout);

    invoke_at(&clock, &debounce, &[(0, "a"), (100, "b")]);
    assert_eq!(*firings.borrow(), vec![(0, "a")]);

    clock.advance_to(Duration::from_millis(200));
    assert_eq!(*firings.borrow(), vec![(0, "a"), (200, "b")]);
}

// ============================================================================
// MAXIMUM FREQUENCY
// ============================================================================

#[test]
fn test_maximum_frequency_caps_rate() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 100, DebounceMode::MaximumFrequency);

    invoke_at(&clock, &debounce, &[(0, "t0"), (80, "t80"), (105, "t105"), (115, "t115")]);
    clock.advance_to(Duration::from_millis(500));

    assert_eq!(
        *firings.borrow(),
        vec![(0, "t0"), (100, "t80"), (200, "t115")]
    );
}

#[test]
fn test_maximum_frequency_does_not_reset_timer() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 100, DebounceMode::MaximumFrequency);

    // A steady stream every 10ms still fires once per window
    let calls: Vec<(u64, &'static str)> = (0..=30)
        .map(|i| (i * 10, if i % 2 == 0 { "even" } else { "odd" }))
        .collect();
    invoke_at(&clock, &debounce, &calls);
    clock.advance_to(Duration::from_millis(1000));

    let times: Vec<u64> = firings.borrow().iter().map(|(t, _)| *t).collect();
    assert_eq!(times, vec![0, 100, 200, 300, 400]);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= 100);
    }
}

// ============================================================================
// CLEAR / FLUSH / DESTROY
// ============================================================================

#[test]
fn test_clear_prevents_firing() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 100, DebounceMode::Timeout);

    invoke_at(&clock, &debounce, &[(0, "a"), (10, "b")]);
    clock.advance_to(Duration::from_millis(11));
    debounce.clear();

    clock.advance_to(Duration::from_millis(120));
    assert!(firings.borrow().is_empty());
    assert_eq!(clock.pending_timers(), 0);
}

#[test]
fn test_clear_restarts_leading_edge() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 100, DebounceMode::ImmediateAndTimeout);

    invoke_at(&clock, &debounce, &[(0, "a"), (10, "b")]);
    clock.advance_to(Duration::from_millis(11));
    debounce.clear();
    assert_eq!(debounce.last_invoked_at(), None);

    invoke_at(&clock, &debounce, &[(20, "c")]);
    assert_eq!(*firings.borrow(), vec![(0, "a"), (20, "c")]);
}

#[test]
fn test_flush_fires_synchronously() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 100, DebounceMode::Timeout);

    invoke_at(&clock, &debounce, &[(0, "a"), (30, "b")]);
    debounce.flush();
    assert_eq!(*firings.borrow(), vec![(30, "b")]);
    assert_eq!(clock.pending_timers(), 0);

    clock.advance_to(Duration::from_millis(500));
    assert_eq!(firings.borrow().len(), 1);
}

#[test]
fn test_destroy_is_permanent_and_idempotent() {
    let clock = VirtualClock::new();
    let (debounce, firings) = recorder(&clock, 100, DebounceMode::Timeout);

    let pending = debounce.invoke("a");
    debounce.destroy();
    debounce.destroy();
    assert!(pending.is_cancelled());

    invoke_at(&clock, &debounce, &[(10, "b"), (500, "c")]);
    debounce.flush();
    clock.advance_to(Duration::from_millis(1000));

    assert!(firings.borrow().is_empty());
    assert!(debounce.is_destroyed());
}

// ============================================================================
// CALLBACK FORMS
// ============================================================================

#[test]
fn test_deferred_outcome_resolves_when_fired() {
    let clock = VirtualClock::new();
    let debounce = Debounce::new(
        clock.clone(),
        Callback::deferred(|n: u32| async move { n * 2 }),
        Duration::from_millis(40),
        DebounceMode::Timeout,
    );

    let superseded = debounce.invoke(1);
    let pending = debounce.invoke(21);
    assert_eq!(pending.try_outcome(), None);

    clock.advance_ms(40);
    assert_eq!(smol::block_on(pending.outcome()), Ok(42));
    assert!(smol::block_on(superseded.outcome()).is_err());
}

#[test]
fn test_handler_routes_through_handle_event() {
    struct Counter {
        total: Cell<u32>,
    }

    impl HandleEvent<u32> for Counter {
        fn handle_event(&self, args: u32) {
            self.total.set(self.total.get() + args);
        }
    }

    let clock = VirtualClock::new();
    let counter = Rc::new(Counter { total: Cell::new(0) });
    let debounce: Debounce<u32> = Debounce::new(
        clock.clone(),
        Callback::handler(counter.clone()),
        Duration::from_millis(10),
        DebounceMode::ImmediateAndTimeout,
    );

    debounce.invoke(5);
    debounce.invoke(7);
    debounce.invoke(9);
    clock.advance_ms(10);

    assert_eq!(counter.total.get(), 14);
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

#[test]
fn test_build_rejects_missing_callback() {
    let clock = VirtualClock::new();
    let err = Debounce::<u32, ()>::builder().delay_ms(10).build(clock).unwrap_err();

    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(err.parameter(), "callback");
    assert_eq!(err.method(), "Debounce::build");
}

#[test]
fn test_build_rejects_missing_or_negative_delay() {
    let clock = VirtualClock::new();

    let missing = Debounce::<u32, ()>::builder()
        .callback(Callback::sync(|_| {}))
        .build(clock.clone())
        .unwrap_err();
    assert_eq!(missing.parameter(), "delayMs");

    let negative = Debounce::<u32, ()>::builder()
        .callback(Callback::sync(|_| {}))
        .delay_ms(-1)
        .build(clock)
        .unwrap_err();
    assert_eq!(negative.parameter(), "delayMs");
}

#[test]
fn test_build_rejects_unknown_mode() {
    let clock = VirtualClock::new();
    let err = Debounce::<u32, ()>::builder()
        .callback(Callback::sync(|_| {}))
        .delay_ms(10)
        .mode_name("throttle")
        .build(clock)
        .unwrap_err();

    assert_eq!(err.parameter(), "mode");
}

// ============================================================================
// REAL TIME
// ============================================================================

#[test]
fn test_local_timers_coalesce_burst() {
    let timers = LocalTimers::new();
    let count = Rc::new(Cell::new(0));

    let seen = count.clone();
    let debounce = Debounce::new(
        timers.clone(),
        Callback::sync(move |_: ()| seen.set(seen.get() + 1)),
        Duration::from_millis(20),
        DebounceMode::Timeout,
    );

    debounce.invoke(());
    debounce.invoke(());
    let last = debounce.invoke(());

    let outcome = timers.block_on(last.outcome());
    assert_eq!(outcome, Ok(()));
    assert_eq!(count.get(), 1);
}
