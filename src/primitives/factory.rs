// ============================================================================
// ember-signals - Signal Factory
// Pluggable construction of the internal cells used by multi-source selectors
// ============================================================================

use std::rc::Rc;

use crate::core::types::{EqualsFn, WritableSignal};
use crate::primitives::atom::Atom;

/// Builds the writable cells that multi-source selectors keep their
/// aggregate value in.
///
/// The default, [`AtomFactory`], builds plain atoms. Passing a custom
/// factory to [`tracked_selector_in`](crate::tracked_selector_in) swaps the
/// cell implementation for every selector built through it, without any
/// global state: two factories can coexist in one program.
pub trait SignalFactory {
    /// Build a writable cell holding `initial`, using `equals` to decide
    /// whether a write counts as a change.
    fn atom<T: Clone + 'static>(&self, initial: T, equals: EqualsFn<T>) -> Rc<dyn WritableSignal<T>>;
}

/// The default factory: cells are [`Atom`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct AtomFactory;

impl SignalFactory for AtomFactory {
    fn atom<T: Clone + 'static>(&self, initial: T, equals: EqualsFn<T>) -> Rc<dyn WritableSignal<T>> {
        Atom::new_with_equals(initial, equals).as_writable()
    }
}
