// ============================================================================
// ember-signals - Behavioral Contract Tests
// The externally observable guarantees of atoms and selectors
// ============================================================================

use ember_signals::{atom, selector, tracked_selector, Unsubscribe};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn equal_atom_write_is_a_complete_noop() {
    let a = atom(5);
    let calls = Rc::new(Cell::new(0));
    let calls_clone = calls.clone();
    let _sub = a.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));
    assert_eq!(calls.get(), 1);

    assert!(!a.set(5));
    assert_eq!(calls.get(), 1);
    assert_eq!(a.get(), 5);
}

#[test]
fn subscribe_delivers_current_value_synchronously() {
    let a = atom(String::from("hello"));
    let seen = Rc::new(RefCell::new(String::new()));
    let seen_clone = seen.clone();
    let _sub = a.subscribe(move |v| *seen_clone.borrow_mut() = v.clone());
    // Delivered before subscribe() returned.
    assert_eq!(*seen.borrow(), "hello");
}

#[test]
fn unsubscribe_handles_are_idempotent_everywhere() {
    let a = atom(0);
    let s = selector(&a, |v| v + 1);
    let a2 = a.clone();
    let m = tracked_selector(move |t| t.get(&a2) * 2);

    let subs: Vec<Unsubscribe> = vec![
        a.subscribe(|_| {}),
        s.subscribe(|_| {}),
        m.subscribe(|_| {}),
    ];
    for sub in &subs {
        sub.unsubscribe();
        sub.unsubscribe();
    }
    assert_eq!(a.count(), 0);
    assert_eq!(s.count(), 0);
    assert_eq!(m.count(), 0);
}

#[test]
fn unsubscribed_selector_reads_never_go_stale() {
    let a = atom(1);
    let s = selector(&a, |v| v * 2);

    // Reads interleaved with writes, no subscription anywhere.
    assert_eq!(s.get(), 2);
    a.set(2);
    assert_eq!(s.get(), 4);
    a.set(3);
    a.set(4);
    assert_eq!(s.get(), 8);

    // A subscribe/unsubscribe cycle must not leave a stale cache behind.
    s.subscribe(|_| {}).unsubscribe();
    a.set(5);
    assert_eq!(s.get(), 10);
}

#[test]
fn derived_output_dedup_single_and_multi() {
    let a = atom(1);

    let single_calls = Rc::new(Cell::new(0));
    let parity = selector(&a, |v| v % 2);
    let sc = single_calls.clone();
    let _s1 = parity.subscribe(move |_| sc.set(sc.get() + 1));

    let multi_calls = Rc::new(Cell::new(0));
    let a2 = a.clone();
    let parity2 = tracked_selector(move |t| t.get(&a2) % 2);
    let mc = multi_calls.clone();
    let _s2 = parity2.subscribe(move |_| mc.set(mc.get() + 1));

    assert_eq!(single_calls.get(), 1);
    assert_eq!(multi_calls.get(), 1);

    // 1 -> 3: both derived outputs unchanged.
    a.set(3);
    assert_eq!(single_calls.get(), 1);
    assert_eq!(multi_calls.get(), 1);

    a.set(2);
    assert_eq!(single_calls.get(), 2);
    assert_eq!(multi_calls.get(), 2);
}

#[test]
fn tracked_sum_follows_both_sources() {
    let a = atom(1);
    let b = atom(2);
    let (a2, b2) = (a.clone(), b.clone());
    let sum = tracked_selector(move |t| t.get(&a2) + t.get(&b2));
    assert_eq!(sum.get(), 3);

    let seen = Rc::new(Cell::new(0));
    let seen_clone = seen.clone();
    let _sub = sum.subscribe(move |v| seen_clone.set(*v));
    assert_eq!(seen.get(), 3);

    a.set(5);
    assert_eq!(seen.get(), 7);
}

#[test]
fn full_lifecycle_scenario() {
    // atom a = 0; selector s = a * 2
    let a = atom(0);
    let s = selector(&a, |v| v * 2);

    let log = Rc::new(RefCell::new(Vec::new()));
    let log_clone = log.clone();
    let sub = s.subscribe(move |v| log_clone.borrow_mut().push(*v));

    // Subscribing delivered 0 immediately.
    assert_eq!(*log.borrow(), vec![0]);

    a.set(10);
    assert_eq!(*log.borrow(), vec![0, 20]);

    sub.unsubscribe();
    a.set(2);
    // No further deliveries after unsubscribing...
    assert_eq!(*log.borrow(), vec![0, 20]);
    // ...but reads still see the live derivation.
    assert_eq!(s.get(), 4);
    a.set(3);
    assert_eq!(s.get(), 6);
}

#[test]
fn callback_unsubscribing_itself_mid_notification() {
    let a = atom(0);
    let calls = Rc::new(Cell::new(0));
    let slot: Rc<RefCell<Option<Unsubscribe>>> = Rc::new(RefCell::new(None));

    let calls_clone = calls.clone();
    let slot_clone = slot.clone();
    let sub = a.subscribe(move |_| {
        calls_clone.set(calls_clone.get() + 1);
        if let Some(handle) = slot_clone.borrow().as_ref() {
            handle.unsubscribe();
        }
    });
    *slot.borrow_mut() = Some(sub);

    a.set(1); // runs once, unsubscribes itself
    a.set(2); // no longer registered
    assert_eq!(calls.get(), 2); // initial delivery + one change
    assert_eq!(a.count(), 0);
}

#[test]
fn subscriber_writing_back_into_the_atom() {
    let a = atom(0);
    let clamp = a.clone();
    let _sub = a.subscribe(move |v| {
        if *v > 100 {
            clamp.set(100);
        }
    });

    a.set(250);
    assert_eq!(a.get(), 100);
}
