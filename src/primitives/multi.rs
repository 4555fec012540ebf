// ============================================================================
// ember-signals - Multi-Source Selector
// A derived value over a set of sources, discovered dynamically through a
// recording accessor or supplied as a fixed list
// ============================================================================
//
// Dependency discovery is a two-phase protocol:
//  - priming: one evaluation of the getter with a recording Track captures
//    the distinct signals it reads, in first-occurrence order, together with
//    each signal's current value.
//  - steady state: the recorded list is replayed for every recomputation and
//    re-subscription. The list is frozen at priming time: a later evaluation
//    that touches a signal not seen during priming reads it live but never
//    subscribes to it, so changes to that signal do not notify.
//
// The aggregate value lives in an internal writable cell built through the
// SignalFactory. Its equality-gated set deduplicates aggregate notifications
// and performs the local fan-out, so the multi-source selector and the
// single-source selector apply the same output-dedup policy.
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::subscribers::Unsubscribe;
use crate::core::types::{AsSignal, Callback, Signal, WritableSignal};

// =============================================================================
// SOURCE SLOTS
// =============================================================================

/// One discovered dependency, type-erased.
///
/// The slot keeps the source's last-seen value (`cache`, an
/// `Rc<RefCell<V>>` behind `dyn Any`) and knows how to open a
/// change-deduplicated subscription to it. Identity is the source's inner
/// allocation, so reading the same signal twice records one slot.
pub(crate) struct SourceSlot {
    key: *const (),
    cache: Rc<dyn Any>,
    attach: Box<dyn Fn(Rc<dyn Fn()>) -> Unsubscribe>,
}

// =============================================================================
// TRACK - the dependency accessor
// =============================================================================

enum TrackMode {
    /// Priming: record every distinct signal read
    Record,
    /// Steady state: replay the recorded per-source caches
    Cached,
    /// Zero-subscriber reads: read through to the live sources
    Live,
}

/// The accessor handed to a multi-source selector's getter.
///
/// Call [`Track::get`] with any signal to read it through the tracker.
/// During the selector's first evaluation this records the signal as a
/// dependency; afterwards the recorded dependency list is replayed.
pub struct Track {
    slots: Rc<RefCell<Vec<SourceSlot>>>,
    mode: TrackMode,
}

impl Track {
    fn record_into(slots: Rc<RefCell<Vec<SourceSlot>>>) -> Self {
        Self {
            slots,
            mode: TrackMode::Record,
        }
    }

    fn cached(slots: Rc<RefCell<Vec<SourceSlot>>>) -> Self {
        Self {
            slots,
            mode: TrackMode::Cached,
        }
    }

    fn live(slots: Rc<RefCell<Vec<SourceSlot>>>) -> Self {
        Self {
            slots,
            mode: TrackMode::Live,
        }
    }

    /// Read a signal through the tracker.
    ///
    /// Per-source change detection uses the value type's `PartialEq`; the
    /// selector's equality policy applies to the aggregate output.
    pub fn get<V, S>(&self, signal: &S) -> V
    where
        V: Clone + PartialEq + 'static,
        S: AsSignal<V>,
    {
        let sig = signal.as_signal();
        let key = Rc::as_ptr(&sig) as *const ();

        match self.mode {
            TrackMode::Record => {
                let value = sig.get();
                let known = self.slots.borrow().iter().any(|slot| slot.key == key);
                if !known {
                    self.slots.borrow_mut().push(Self::new_slot(key, sig, value.clone()));
                }
                value
            }
            TrackMode::Cached => {
                let cached = self
                    .slots
                    .borrow()
                    .iter()
                    .find(|slot| slot.key == key)
                    .and_then(|slot| slot.cache.clone().downcast::<RefCell<V>>().ok());
                match cached {
                    Some(cache) => cache.borrow().clone(),
                    // Not seen at priming: the dependency list is frozen, so
                    // read live without tracking.
                    None => sig.get(),
                }
            }
            TrackMode::Live => sig.get(),
        }
    }

    fn new_slot<V>(key: *const (), sig: Rc<dyn Signal<V>>, value: V) -> SourceSlot
    where
        V: Clone + PartialEq + 'static,
    {
        let cache: Rc<RefCell<V>> = Rc::new(RefCell::new(value));
        let slot_cache = cache.clone();

        let attach = move |on_change: Rc<dyn Fn()>| {
            let cache = slot_cache.clone();
            sig.subscribe(Rc::new(move |value: &V| {
                let changed = {
                    let current = cache.borrow();
                    *current != *value
                };
                if changed {
                    *cache.borrow_mut() = value.clone();
                    (*on_change)();
                }
            }))
        };

        SourceSlot {
            key,
            cache,
            attach: Box::new(attach),
        }
    }
}

// =============================================================================
// MULTI SELECTOR INNER
// =============================================================================

/// The internal data for a multi-source selector.
pub struct MultiSelectorInner<U> {
    /// The derivation function, evaluated through a Track accessor
    getter: Box<dyn Fn(&Track) -> U>,

    /// Builds the internal aggregate cell on priming (factory capture)
    make_cell: Box<dyn Fn(U) -> Rc<dyn WritableSignal<U>>>,

    /// Internal cell holding the aggregate (None = not primed). Its
    /// equality-gated writes deduplicate notifications and fan out to the
    /// local subscribers.
    cell: RefCell<Option<Rc<dyn WritableSignal<U>>>>,

    /// Dependency list discovered at priming, index-aligned with `upstream`
    sources: Rc<RefCell<Vec<SourceSlot>>>,

    /// Per-source subscriptions, present only while live
    upstream: RefCell<Vec<Unsubscribe>>,

    /// Number of external subscribers
    local: Cell<usize>,

    /// Weak self-reference, set right after construction
    self_ref: RefCell<Weak<MultiSelectorInner<U>>>,
}

impl<U: Clone + 'static> MultiSelectorInner<U> {
    /// Prime if needed and return the internal cell.
    fn cell(&self) -> Rc<dyn WritableSignal<U>> {
        if let Some(cell) = self.cell.borrow().clone() {
            return cell;
        }

        // First evaluation: discover dependencies and capture their values.
        let track = Track::record_into(self.sources.clone());
        let initial = (self.getter)(&track);

        let cell = (self.make_cell)(initial);
        *self.cell.borrow_mut() = Some(cell.clone());
        cell
    }

    /// Recompute against the live sources, without touching any cache.
    fn fresh(&self) -> U {
        (self.getter)(&Track::live(self.sources.clone()))
    }

    /// Open one subscription per discovered source if not already live.
    ///
    /// All per-source subscriptions share a single one-shot guard: their
    /// deliver-on-subscribe echoes all happen before any genuine change can,
    /// so one flag covers every slot.
    fn attach_upstream(&self) {
        if !self.upstream.borrow().is_empty() {
            return;
        }

        let first_subscribe = Rc::new(Cell::new(true));
        let weak = self.self_ref.borrow().clone();
        let guard = first_subscribe.clone();

        let on_change: Rc<dyn Fn()> = Rc::new(move || {
            if guard.get() {
                return;
            }
            let Some(me) = weak.upgrade() else {
                return;
            };

            // A source genuinely changed: recompute over the per-source
            // caches and push the aggregate through the cell, which applies
            // the output equality policy before notifying.
            let aggregate = (me.getter)(&Track::cached(me.sources.clone()));
            let cell = me.cell.borrow().clone();
            if let Some(cell) = cell {
                cell.set(aggregate);
            }
        });

        let mut handles = Vec::new();
        for slot in self.sources.borrow().iter() {
            handles.push((slot.attach)(on_change.clone()));
        }
        *self.upstream.borrow_mut() = handles;
        first_subscribe.set(false);
    }

    fn release_upstream(&self) {
        for handle in self.upstream.borrow_mut().drain(..) {
            handle.unsubscribe();
        }
    }
}

impl<U: Clone + 'static> Signal<U> for MultiSelectorInner<U> {
    fn get(&self) -> U {
        let primed = self.cell.borrow().is_some();
        if !primed {
            return self.cell().get();
        }
        if self.local.get() == 0 {
            // No live subscriptions keep the caches fresh.
            return self.fresh();
        }
        self.cell().get()
    }

    fn subscribe(&self, callback: Callback<U>) -> Unsubscribe {
        let was_primed = self.cell.borrow().is_some();
        let cell = self.cell();

        let was_live = !self.upstream.borrow().is_empty();
        self.attach_upstream();
        if was_primed && !was_live {
            // Re-subscribing after a detached period: the attach echoes
            // refreshed the per-source caches, so fold any changes missed
            // while detached into the aggregate cell before it delivers to
            // the new subscriber. The cell has no subscribers yet, so this
            // cannot notify anyone.
            let aggregate = (self.getter)(&Track::cached(self.sources.clone()));
            cell.set(aggregate);
        }

        // The cell delivers the current aggregate to the callback and owns
        // its registration; this selector only counts external subscribers
        // and ties the upstream subscriptions to that count.
        let registration = cell.subscribe(callback);
        self.local.set(self.local.get() + 1);

        let weak = self.self_ref.borrow().clone();
        let done = Cell::new(false);
        Unsubscribe::new(move || {
            if done.get() {
                return;
            }
            done.set(true);
            registration.unsubscribe();
            if let Some(me) = weak.upgrade() {
                me.local.set(me.local.get() - 1);
                if me.local.get() == 0 {
                    me.release_upstream();
                }
            }
        })
    }

    fn count(&self) -> usize {
        self.local.get()
    }
}

// =============================================================================
// MULTI SELECTOR HANDLE
// =============================================================================

/// A read-only derived value over a set of source signals.
///
/// Created with [`tracked_selector`](crate::tracked_selector) (dynamic
/// dependency discovery) or [`selector_many`](crate::selector_many) (fixed
/// list). While unsubscribed, every read recomputes against the live
/// sources; while subscribed, each source is observed through its own
/// change-deduplicated subscription and the aggregate is recomputed over the
/// per-source caches.
pub struct MultiSelector<U> {
    inner: Rc<MultiSelectorInner<U>>,
}

impl<U> Clone for MultiSelector<U> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<U: Clone + 'static> MultiSelector<U> {
    pub(crate) fn new(
        getter: impl Fn(&Track) -> U + 'static,
        make_cell: impl Fn(U) -> Rc<dyn WritableSignal<U>> + 'static,
    ) -> Self {
        let inner = Rc::new(MultiSelectorInner {
            getter: Box::new(getter),
            make_cell: Box::new(make_cell),
            cell: RefCell::new(None),
            sources: Rc::new(RefCell::new(Vec::new())),
            upstream: RefCell::new(Vec::new()),
            local: Cell::new(0),
            self_ref: RefCell::new(Weak::new()),
        });
        *inner.self_ref.borrow_mut() = Rc::downgrade(&inner);
        Self { inner }
    }

    /// Current aggregate value.
    pub fn get(&self) -> U {
        self.inner.get()
    }

    /// Register a subscriber. Invoked once immediately with the current
    /// aggregate, then whenever a source change produces a different
    /// aggregate per the equality policy.
    pub fn subscribe(&self, callback: impl Fn(&U) + 'static) -> Unsubscribe {
        self.inner.subscribe(Rc::new(callback))
    }

    /// Number of active local subscribers (diagnostic).
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// This selector as a type-erased read/subscribe handle.
    pub fn as_signal(&self) -> Rc<dyn Signal<U>> {
        self.inner.clone()
    }
}

impl<U: Clone + 'static> AsSignal<U> for MultiSelector<U> {
    fn as_signal(&self) -> Rc<dyn Signal<U>> {
        self.inner.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
