// ============================================================================
// ember-signals - Atom Primitive
// The writable reactive cell
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::subscribers::{SubscriberSet, Unsubscribe};
use crate::core::types::{default_equals, AsSignal, Callback, EqualsFn, Signal, WritableSignal};

// =============================================================================
// ATOM INNER
// =============================================================================

/// The internal data for an atom.
///
/// Separate from `Atom<T>` so it can implement the `Signal`/`WritableSignal`
/// traits and be stored as `Rc<dyn Signal<T>>` by selectors.
pub struct AtomInner<T> {
    /// The current value
    value: RefCell<T>,

    /// Equality policy deciding whether a write counts as a change
    equals: EqualsFn<T>,

    /// Registered subscriber callbacks, in registration order
    subscribers: Rc<SubscriberSet<T>>,
}

impl<T: Clone> AtomInner<T> {
    fn new(value: T, equals: EqualsFn<T>) -> Self {
        Self {
            value: RefCell::new(value),
            equals,
            subscribers: Rc::new(SubscriberSet::new()),
        }
    }

    fn get_value(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `value` if it differs from the current one, then notify every
    /// subscriber with the new value. Returns true if the value changed.
    fn set_value(&self, value: T) -> bool {
        let changed = {
            let current = self.value.borrow();
            !(self.equals)(&current, &value)
        };

        if changed {
            *self.value.borrow_mut() = value.clone();
            self.subscribers.notify(&value);
        }

        changed
    }
}

impl<T: Clone + 'static> Signal<T> for AtomInner<T> {
    fn get(&self) -> T {
        self.get_value()
    }

    fn subscribe(&self, callback: Callback<T>) -> Unsubscribe {
        // Deliver-on-subscribe: the callback sees the current value before
        // it is registered. The value is cloned out first so the callback is
        // free to write back into this atom.
        let current = self.get_value();
        (*callback)(&current);

        let id = self.subscribers.add(callback);
        let subscribers = Rc::downgrade(&self.subscribers);
        Unsubscribe::new(move || {
            if let Some(set) = subscribers.upgrade() {
                set.remove(id);
            }
        })
    }

    fn count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone + 'static> WritableSignal<T> for AtomInner<T> {
    fn set(&self, value: T) -> bool {
        self.set_value(value)
    }
}

// =============================================================================
// ATOM<T> - The public atom handle
// =============================================================================

/// A mutable reactive cell.
///
/// Writing a value that differs from the current one (per the equality
/// policy) synchronously notifies every subscriber before `set` returns.
/// Writing an equal value is a complete no-op.
///
/// # Example
///
/// ```
/// use ember_signals::atom;
///
/// let count = atom(0);
/// assert_eq!(count.get(), 0);
///
/// let seen = std::rc::Rc::new(std::cell::Cell::new(-1));
/// let seen_clone = seen.clone();
/// let sub = count.subscribe(move |v| seen_clone.set(*v));
/// assert_eq!(seen.get(), 0); // delivered on subscribe
///
/// count.set(5);
/// assert_eq!(seen.get(), 5);
/// sub.unsubscribe();
/// ```
#[derive(Clone)]
pub struct Atom<T> {
    inner: Rc<AtomInner<T>>,
}

impl<T: Clone + 'static> Atom<T> {
    /// Create a new atom with the given initial value.
    pub fn new(value: T) -> Self
    where
        T: PartialEq,
    {
        Self::new_with_equals(value, default_equals)
    }

    /// Create a new atom with a custom equality policy.
    pub fn new_with_equals(value: T, equals: EqualsFn<T>) -> Self {
        Self {
            inner: Rc::new(AtomInner::new(value, equals)),
        }
    }

    /// Get the current value (cloning). O(1), no side effects.
    pub fn get(&self) -> T {
        self.inner.get_value()
    }

    /// Access the current value with a closure (avoids cloning).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Set the value. Returns true if it changed; an unchanged write sends
    /// no notifications.
    pub fn set(&self, value: T) -> bool {
        self.inner.set_value(value)
    }

    /// Mutate the value in place, then notify subscribers.
    ///
    /// The old value is consumed by the mutation, so no equality check is
    /// possible: an update always counts as a change.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut current = self.inner.value.borrow_mut();
            f(&mut current);
        }
        let current = self.inner.get_value();
        self.inner.subscribers.notify(&current);
    }

    /// Register a subscriber. Invoked once immediately with the current
    /// value, then on every change. The returned handle is idempotent.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Unsubscribe {
        self.inner.subscribe(Rc::new(callback))
    }

    /// Number of active subscribers (diagnostic).
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// This atom as a type-erased read/subscribe handle.
    pub fn as_signal(&self) -> Rc<dyn Signal<T>> {
        self.inner.clone()
    }

    /// This atom as a type-erased writable handle.
    pub fn as_writable(&self) -> Rc<dyn WritableSignal<T>> {
        self.inner.clone()
    }
}

impl<T: Clone + 'static> AsSignal<T> for Atom<T> {
    fn as_signal(&self) -> Rc<dyn Signal<T>> {
        self.inner.clone()
    }
}

impl<T: Clone + std::fmt::Debug + 'static> std::fmt::Debug for Atom<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Atom").field("value", &self.get()).finish()
    }
}

// =============================================================================
// CONSTRUCTION FUNCTIONS
// =============================================================================

/// Create a new atom.
///
/// # Example
///
/// ```
/// use ember_signals::atom;
///
/// let name = atom(String::from("ember"));
/// name.set(String::from("signals"));
/// assert_eq!(name.get(), "signals");
/// ```
pub fn atom<T>(value: T) -> Atom<T>
where
    T: Clone + PartialEq + 'static,
{
    Atom::new(value)
}

/// Create an atom with a custom equality policy.
///
/// # Example
///
/// ```
/// use ember_signals::{atom_with_equals, safe_equals_f64};
///
/// let reading = atom_with_equals(f64::NAN, safe_equals_f64);
///
/// // NaN counts as equal to itself, so this write is a no-op.
/// assert!(!reading.set(f64::NAN));
/// assert!(reading.set(1.5));
/// ```
pub fn atom_with_equals<T>(value: T, equals: EqualsFn<T>) -> Atom<T>
where
    T: Clone + 'static,
{
    Atom::new_with_equals(value, equals)
}

// =============================================================================
// TESTS
// =============================================================================
