// ============================================================================
// ember-signals - Type Definitions
// The capability traits shared by atoms and selectors
// ============================================================================

use std::rc::Rc;

use super::subscribers::Unsubscribe;

// =============================================================================
// EQUALITY
// =============================================================================

/// Equality function type for deciding whether a new value counts as a change.
pub type EqualsFn<T> = fn(&T, &T) -> bool;

/// Default equality using PartialEq.
pub fn default_equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

// =============================================================================
// CALLBACKS
// =============================================================================

/// A subscriber callback, invoked with a borrow of the current value.
///
/// Callbacks are reference-counted so subscriber sets can snapshot them
/// cheaply during fan-out. Registering the same `Rc` twice is a single
/// registration (identity semantics, like a JS `Set` of functions).
pub type Callback<T> = Rc<dyn Fn(&T)>;

// =============================================================================
// SIGNAL TRAITS
// =============================================================================
//
// These traits are object-safe so signals of different concrete kinds (atoms,
// single- and multi-source selectors) can be observed uniformly through
// `Rc<dyn Signal<T>>`. Graph composition only ever needs read + subscribe;
// writing is an atom-only capability split into its own trait.
// =============================================================================

/// The read/subscribe capability shared by every reactive value.
pub trait Signal<T: Clone> {
    /// Current value (cloning). Never stale: signals without subscribers
    /// recompute on demand, signals with subscribers serve a live cache.
    fn get(&self) -> T;

    /// Register a subscriber. The callback is invoked synchronously once with
    /// the current value before this call returns, then again on every future
    /// change. The returned handle removes exactly this registration and is
    /// idempotent.
    fn subscribe(&self, callback: Callback<T>) -> Unsubscribe;

    /// Number of active subscribers (diagnostic).
    fn count(&self) -> usize;
}

/// A signal that can also be written directly. Implemented by atoms.
pub trait WritableSignal<T: Clone>: Signal<T> {
    /// Set the value. Returns true if it changed (per the equality policy);
    /// an unchanged write is a complete no-op with no notifications.
    fn set(&self, value: T) -> bool;
}

/// Conversion into a type-erased signal handle, for composing selectors over
/// atoms and other selectors alike.
pub trait AsSignal<T: Clone> {
    fn as_signal(&self) -> Rc<dyn Signal<T>>;
}

impl<T: Clone + 'static> AsSignal<T> for Rc<dyn Signal<T>> {
    fn as_signal(&self) -> Rc<dyn Signal<T>> {
        self.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_equals_uses_partial_eq() {
        assert!(default_equals(&42, &42));
        assert!(!default_equals(&42, &43));
        assert!(default_equals(&"same", &"same"));
    }

    #[test]
    fn equals_fn_is_a_plain_fn_pointer() {
        let eq: EqualsFn<i32> = default_equals;
        assert!(eq(&1, &1));
        assert!(!eq(&1, &2));
    }
}
