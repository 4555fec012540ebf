// ============================================================================
// ember-signals - Subscription Lifecycle Tests
// Upstream acquisition and release across subscribe/unsubscribe cycles
// ============================================================================

use ember_signals::{atom, selector, tracked_selector};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn single_selector_lifecycle_cycles() {
    let a = atom(1);
    let s = selector(&a, |v| v * 2);

    for round in 0..3 {
        assert_eq!(a.count(), 0, "round {round}: inert before subscribe");

        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();
        let sub = s.subscribe(move |v| seen_clone.set(*v));
        assert_eq!(a.count(), 1);

        a.set(round + 10);
        assert_eq!(seen.get(), (round + 10) * 2);

        sub.unsubscribe();
        assert_eq!(a.count(), 0, "round {round}: released after unsubscribe");
    }
}

#[test]
fn multi_selector_lifecycle_cycles() {
    let a = atom(1);
    let b = atom(2);
    let (a2, b2) = (a.clone(), b.clone());
    let sum = tracked_selector(move |t| t.get(&a2) + t.get(&b2));

    for _ in 0..3 {
        let sub = sum.subscribe(|_| {});
        assert_eq!(a.count(), 1);
        assert_eq!(b.count(), 1);

        sub.unsubscribe();
        assert_eq!(a.count(), 0);
        assert_eq!(b.count(), 0);
    }

    // Values still correct after all the cycling.
    a.set(100);
    assert_eq!(sum.get(), 102);
}

#[test]
fn upstream_held_until_last_subscriber_leaves() {
    let a = atom(0);
    let s = selector(&a, |v| v + 1);

    let sub1 = s.subscribe(|_| {});
    let sub2 = s.subscribe(|_| {});
    let sub3 = s.subscribe(|_| {});
    assert_eq!(s.count(), 3);
    assert_eq!(a.count(), 1);

    sub2.unsubscribe();
    sub1.unsubscribe();
    assert_eq!(s.count(), 1);
    assert_eq!(a.count(), 1);

    sub3.unsubscribe();
    assert_eq!(s.count(), 0);
    assert_eq!(a.count(), 0);
}

#[test]
fn selector_dropped_while_live_leaves_source_working() {
    let a = atom(0);
    {
        let a2 = a.clone();
        let s = tracked_selector(move |t| t.get(&a2) * 2);
        let _sub = s.subscribe(|_| {});
        assert_eq!(a.count(), 1);
    }
    // Selector and handle dropped without unsubscribing. Writes must not
    // panic; the dead callback just never fires again.
    a.set(7);
    assert_eq!(a.get(), 7);
}

#[test]
fn unsubscribe_outliving_the_signal() {
    let sub = {
        let a = atom(1);
        a.subscribe(|_| {})
    };
    // The atom is gone; the handle holds only weak references.
    sub.unsubscribe();
    sub.unsubscribe();
}

#[test]
fn counts_track_each_layer_independently() {
    let a = atom(1);
    let s = selector(&a, |v| v + 1);
    let s2 = s.clone();
    let m = tracked_selector(move |t| t.get(&s2) * 10);

    let sub_m = m.subscribe(|_| {});
    // m subscribes to s, s subscribes to a.
    assert_eq!(m.count(), 1);
    assert_eq!(s.count(), 1);
    assert_eq!(a.count(), 1);

    let sub_s = s.subscribe(|_| {});
    assert_eq!(s.count(), 2);
    assert_eq!(a.count(), 1);

    sub_m.unsubscribe();
    // m released s, but the direct subscriber keeps s live.
    assert_eq!(s.count(), 1);
    assert_eq!(a.count(), 1);

    sub_s.unsubscribe();
    assert_eq!(s.count(), 0);
    assert_eq!(a.count(), 0);
}

#[test]
fn resubscribing_delivers_the_current_value_again() {
    let a = atom(1);
    let s = selector(&a, |v| v * 3);

    let first = Rc::new(Cell::new(0));
    let first_clone = first.clone();
    let sub = s.subscribe(move |v| first_clone.set(*v));
    assert_eq!(first.get(), 3);
    sub.unsubscribe();

    a.set(5);

    let second = Rc::new(Cell::new(0));
    let second_clone = second.clone();
    let _sub = s.subscribe(move |v| second_clone.set(*v));
    // Delivery reflects the write that happened while detached.
    assert_eq!(second.get(), 15);
}
