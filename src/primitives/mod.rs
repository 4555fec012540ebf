// ============================================================================
// ember-signals - Primitives Module
// Atoms, selectors, and the cell factory
// ============================================================================

pub mod atom;
pub mod factory;
pub mod multi;
pub mod selector;
pub mod single;

// Re-export commonly used items
pub use atom::{atom, atom_with_equals, Atom};
pub use factory::{AtomFactory, SignalFactory};
pub use multi::{MultiSelector, Track};
pub use selector::{
    selector, selector_many, selector_many_in, selector_many_with_equals, selector_with_equals,
    tracked_selector, tracked_selector_in, tracked_selector_with_equals,
};
pub use single::SingleSelector;
