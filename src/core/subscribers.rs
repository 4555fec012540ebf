// ============================================================================
// ember-signals - Subscriber Bookkeeping
// Insertion-ordered callback registry with snapshot-safe fan-out
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::types::Callback;

// =============================================================================
// UNSUBSCRIBE
// =============================================================================

/// Handle that removes one subscriber registration.
///
/// Idempotent: invoking it a second time is a no-op. The handle holds only
/// weak references to the signal it came from, so keeping it around does not
/// keep the signal alive.
#[must_use = "dropping an Unsubscribe without calling it leaves the subscription active"]
pub struct Unsubscribe {
    remove: Box<dyn Fn()>,
}

impl Unsubscribe {
    pub(crate) fn new(remove: impl Fn() + 'static) -> Self {
        Self {
            remove: Box::new(remove),
        }
    }

    /// Remove the registration this handle was returned for.
    pub fn unsubscribe(&self) {
        (self.remove)()
    }
}

// =============================================================================
// SUBSCRIBER SET
// =============================================================================

/// The set of callbacks registered on one signal.
///
/// Entries are kept in registration order and keyed by a monotonically
/// increasing id. Re-registering the same `Rc` callback collapses onto the
/// existing entry (identity semantics), so each callback reference is
/// notified at most once per change.
///
/// Notification iterates a snapshot taken at fan-out start: entries removed
/// mid-notification (including a callback unsubscribing itself) are skipped,
/// entries added mid-notification are first invoked on the next round, and
/// unrelated entries are never skipped or double-called.
pub(crate) struct SubscriberSet<T> {
    entries: RefCell<Vec<(u64, Callback<T>)>>,
    next_id: Cell<u64>,
}

impl<T> SubscriberSet<T> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register a callback, returning its id. A callback `Rc` that is already
    /// registered keeps its existing id and position.
    pub fn add(&self, callback: Callback<T>) -> u64 {
        let mut entries = self.entries.borrow_mut();
        if let Some((id, _)) = entries
            .iter()
            .find(|(_, existing)| Rc::ptr_eq(existing, &callback))
        {
            return *id;
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        entries.push((id, callback));
        id
    }

    /// Remove the entry with the given id. Returns true if it was present.
    pub fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|(entry_id, _)| *entry_id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Invoke every currently-registered callback with `value`, in
    /// registration order. No borrow is held while a callback runs, so
    /// callbacks are free to read, write, subscribe, and unsubscribe.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<(u64, Callback<T>)> = self.entries.borrow().clone();
        for (id, callback) in snapshot {
            if self.contains(id) {
                (*callback)(value);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
