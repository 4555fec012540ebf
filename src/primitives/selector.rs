// ============================================================================
// ember-signals - Selector Constructors
// The public entry points for building derived signals
// ============================================================================

use crate::core::types::{default_equals, AsSignal, EqualsFn, Signal};
use crate::primitives::factory::{AtomFactory, SignalFactory};
use crate::primitives::multi::{MultiSelector, Track};
use crate::primitives::single::SingleSelector;

use std::rc::Rc;

// =============================================================================
// SINGLE-SOURCE
// =============================================================================

/// Create a selector deriving from exactly one signal.
///
/// The getter receives the upstream value by reference. Output notifications
/// are deduplicated with the output type's `PartialEq`.
///
/// # Example
///
/// ```
/// use ember_signals::{atom, selector};
///
/// let celsius = atom(20.0_f64);
/// let fahrenheit = selector(&celsius, |c| c * 9.0 / 5.0 + 32.0);
/// assert_eq!(fahrenheit.get(), 68.0);
///
/// celsius.set(25.0);
/// assert_eq!(fahrenheit.get(), 77.0);
/// ```
pub fn selector<T, U, S>(from: &S, getter: impl Fn(&T) -> U + 'static) -> SingleSelector<T, U>
where
    T: Clone + 'static,
    U: Clone + PartialEq + 'static,
    S: AsSignal<T>,
{
    SingleSelector::new(from.as_signal(), getter, default_equals)
}

/// Like [`selector`], with a custom equality policy for the derived output.
pub fn selector_with_equals<T, U, S>(
    from: &S,
    getter: impl Fn(&T) -> U + 'static,
    equals: EqualsFn<U>,
) -> SingleSelector<T, U>
where
    T: Clone + 'static,
    U: Clone + 'static,
    S: AsSignal<T>,
{
    SingleSelector::new(from.as_signal(), getter, equals)
}

// =============================================================================
// MULTI-SOURCE, DYNAMIC DISCOVERY
// =============================================================================

/// Create a selector whose dependencies are discovered by running the getter.
///
/// The getter reads its sources through the [`Track`] accessor; every signal
/// it reads during the first evaluation becomes a tracked dependency. The
/// dependency list is frozen after that first run.
///
/// # Example
///
/// ```
/// use ember_signals::{atom, tracked_selector};
///
/// let first = atom(String::from("Ada"));
/// let last = atom(String::from("Lovelace"));
///
/// let (f, l) = (first.clone(), last.clone());
/// let full = tracked_selector(move |t| format!("{} {}", t.get(&f), t.get(&l)));
/// assert_eq!(full.get(), "Ada Lovelace");
/// ```
pub fn tracked_selector<U>(getter: impl Fn(&Track) -> U + 'static) -> MultiSelector<U>
where
    U: Clone + PartialEq + 'static,
{
    tracked_selector_in(AtomFactory, getter, default_equals)
}

/// Like [`tracked_selector`], with a custom equality policy for the
/// aggregate output.
pub fn tracked_selector_with_equals<U>(
    getter: impl Fn(&Track) -> U + 'static,
    equals: EqualsFn<U>,
) -> MultiSelector<U>
where
    U: Clone + 'static,
{
    tracked_selector_in(AtomFactory, getter, equals)
}

/// Like [`tracked_selector`], but the internal aggregate cell is built
/// through `factory` instead of the default atom factory.
pub fn tracked_selector_in<U, F>(
    factory: F,
    getter: impl Fn(&Track) -> U + 'static,
    equals: EqualsFn<U>,
) -> MultiSelector<U>
where
    U: Clone + 'static,
    F: SignalFactory + 'static,
{
    MultiSelector::new(getter, move |initial| factory.atom(initial, equals))
}

// =============================================================================
// MULTI-SOURCE, FIXED LIST
// =============================================================================

/// Create a selector over a fixed, homogeneous list of sources.
///
/// The getter receives the sources' current values as a slice, in the order
/// the sources were given.
///
/// # Example
///
/// ```
/// use ember_signals::{atom, selector_many};
///
/// let xs = [atom(1), atom(2), atom(3)];
/// let total = selector_many(&xs, |values| values.iter().sum::<i32>());
/// assert_eq!(total.get(), 6);
///
/// xs[0].set(10);
/// assert_eq!(total.get(), 15);
/// ```
pub fn selector_many<T, U, S>(
    sources: &[S],
    getter: impl Fn(&[T]) -> U + 'static,
) -> MultiSelector<U>
where
    T: Clone + PartialEq + 'static,
    U: Clone + PartialEq + 'static,
    S: AsSignal<T>,
{
    selector_many_in(AtomFactory, sources, getter, default_equals)
}

/// Like [`selector_many`], with a custom equality policy for the aggregate
/// output.
pub fn selector_many_with_equals<T, U, S>(
    sources: &[S],
    getter: impl Fn(&[T]) -> U + 'static,
    equals: EqualsFn<U>,
) -> MultiSelector<U>
where
    T: Clone + PartialEq + 'static,
    U: Clone + 'static,
    S: AsSignal<T>,
{
    selector_many_in(AtomFactory, sources, getter, equals)
}

/// Like [`selector_many`], with an explicit cell factory.
///
/// The fixed list is a shape over the tracked machinery: each listed source
/// is read through the tracker in order, so per-source change detection and
/// subscription lifecycle are identical to [`tracked_selector`].
pub fn selector_many_in<T, U, S, F>(
    factory: F,
    sources: &[S],
    getter: impl Fn(&[T]) -> U + 'static,
    equals: EqualsFn<U>,
) -> MultiSelector<U>
where
    T: Clone + PartialEq + 'static,
    U: Clone + 'static,
    S: AsSignal<T>,
    F: SignalFactory + 'static,
{
    let sources: Vec<Rc<dyn Signal<T>>> = sources.iter().map(|s| s.as_signal()).collect();
    tracked_selector_in(
        factory,
        move |track| {
            let values: Vec<T> = sources.iter().map(|s| track.get(s)).collect();
            getter(&values)
        },
        equals,
    )
}
