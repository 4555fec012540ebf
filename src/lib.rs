// ============================================================================
// ember-signals - A subscription-based signals library for Rust
// Atoms and derived selectors for application state
// ============================================================================

//! # ember-signals
//!
//! A small reactive state library built on three pieces:
//!
//! - **[`atom`]** - a mutable cell. Writing a genuinely new value
//!   synchronously notifies every subscriber; writing an equal value is a
//!   no-op.
//! - **[`selector`]** - a derived value over exactly one signal, recomputed
//!   on upstream changes and deduplicated on its own output.
//! - **[`tracked_selector`]** / **[`selector_many`]** - a derived value over
//!   several signals, with dependencies discovered dynamically through a
//!   tracking accessor or supplied as a fixed list.
//!
//! Everything is pull-until-subscribed: a selector with no subscribers holds
//! no upstream subscriptions and recomputes on every read, so unused derived
//! state costs nothing between reads. The first subscriber flips it to push:
//! the selector subscribes upstream, caches, and fans out changes. The last
//! unsubscribe releases the upstream subscriptions again.
//!
//! ## Quick start
//!
//! ```
//! use ember_signals::{atom, selector, tracked_selector};
//!
//! let price = atom(10.0_f64);
//! let quantity = atom(2.0_f64);
//!
//! // Single-source derivation
//! let with_tax = selector(&price, |p| p * 1.2);
//! assert_eq!(with_tax.get(), 12.0);
//!
//! // Multi-source derivation with dynamic dependency discovery
//! let (p, q) = (price.clone(), quantity.clone());
//! let total = tracked_selector(move |t| t.get(&p) * t.get(&q));
//! assert_eq!(total.get(), 20.0);
//!
//! // Subscriptions deliver the current value immediately, then on change
//! let sub = total.subscribe(|v| println!("total: {v}"));
//! price.set(15.0); // prints "total: 30"
//! sub.unsubscribe();
//! ```
//!
//! ## Equality policies
//!
//! Every signal carries an equality function deciding whether a write or a
//! recomputed output counts as a change. The default is `PartialEq`;
//! [`atom_with_equals`] and the `*_with_equals` selector constructors take a
//! custom policy, and [`reactivity::equality`] ships ready-made ones such as
//! [`safe_equals_f64`] for NaN-tolerant float comparison.
//!
//! ## Single-threaded by design
//!
//! Handles are `Rc`-based and `!Send`: signals live on one thread and
//! notification is synchronous and reentrancy-safe. Subscriber callbacks may
//! freely read, write, subscribe, and unsubscribe.

pub mod core;
pub mod primitives;
pub mod reactivity;

// =============================================================================
// PUBLIC API RE-EXPORTS
// =============================================================================

pub use crate::core::subscribers::Unsubscribe;
pub use crate::core::types::{default_equals, AsSignal, Callback, EqualsFn, Signal, WritableSignal};

pub use crate::primitives::atom::{atom, atom_with_equals, Atom};
pub use crate::primitives::factory::{AtomFactory, SignalFactory};
pub use crate::primitives::multi::{MultiSelector, Track};
pub use crate::primitives::selector::{
    selector, selector_many, selector_many_in, selector_many_with_equals, selector_with_equals,
    tracked_selector, tracked_selector_in, tracked_selector_with_equals,
};
pub use crate::primitives::single::SingleSelector;

pub use crate::reactivity::equality::{
    always_equals, never_equals, safe_equals_f32, safe_equals_f64, shallow_equals_vec,
};

// =============================================================================
// TESTS
// =============================================================================
