// ============================================================================
// ember-signals - Single-Source Selector
// A derived value computed from exactly one upstream signal
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::subscribers::{SubscriberSet, Unsubscribe};
use crate::core::types::{AsSignal, Callback, EqualsFn, Signal};

// =============================================================================
// SINGLE SELECTOR INNER
// =============================================================================

/// The internal data for a single-source selector.
///
/// Lifecycle: created inert (no cache, no upstream subscription); primed on
/// first read or subscribe (cache filled); live while at least one external
/// subscriber is attached (one upstream subscription open); back to primed
/// when the last subscriber detaches (upstream released, cache retained).
pub struct SingleSelectorInner<T, U> {
    /// The upstream signal this selector derives from
    from: Rc<dyn Signal<T>>,

    /// The derivation function
    getter: Box<dyn Fn(&T) -> U>,

    /// Equality policy for deduplicating derived-output notifications
    equals: EqualsFn<U>,

    /// Cached derived value (None = not primed)
    value: RefCell<Option<U>>,

    /// Upstream subscription, present only while live
    upstream: RefCell<Option<Unsubscribe>>,

    /// Local subscriber callbacks
    subscribers: Rc<SubscriberSet<U>>,

    /// Weak self-reference, set right after construction, so upstream
    /// callbacks and unsubscribe handles never keep the selector alive
    self_ref: RefCell<Weak<SingleSelectorInner<T, U>>>,
}

impl<T, U> SingleSelectorInner<T, U>
where
    T: Clone + 'static,
    U: Clone + 'static,
{
    /// Compute once and cache if not yet primed; return the cached value.
    fn prime(&self) -> U {
        let cached = self.value.borrow().clone();
        match cached {
            Some(value) => value,
            None => {
                let value = (self.getter)(&self.from.get());
                *self.value.borrow_mut() = Some(value.clone());
                value
            }
        }
    }

    /// Recompute against the live upstream value, without touching the cache.
    fn fresh(&self) -> U {
        (self.getter)(&self.from.get())
    }

    /// Open the upstream subscription if it is not already open.
    ///
    /// The subscription's own deliver-on-subscribe echo refreshes the cache
    /// silently (the cache may be stale after a detached period) but never
    /// notifies; every later upstream notification recomputes and, only when
    /// the derived output actually changed, updates the cache and notifies
    /// local subscribers.
    fn attach_upstream(&self) {
        if self.upstream.borrow().is_some() {
            return;
        }

        let first_subscribe = Rc::new(Cell::new(true));
        let guard = first_subscribe.clone();
        let weak = self.self_ref.borrow().clone();

        let handle = self.from.subscribe(Rc::new(move |from_value: &T| {
            let Some(me) = weak.upgrade() else {
                return;
            };

            let next = (me.getter)(from_value);
            if guard.get() {
                *me.value.borrow_mut() = Some(next);
                return;
            }
            let unchanged = match &*me.value.borrow() {
                Some(current) => (me.equals)(current, &next),
                None => false,
            };
            if unchanged {
                return;
            }

            *me.value.borrow_mut() = Some(next.clone());
            me.subscribers.notify(&next);
        }));
        first_subscribe.set(false);

        *self.upstream.borrow_mut() = Some(handle);
    }

    fn release_upstream(&self) {
        if let Some(handle) = self.upstream.borrow_mut().take() {
            handle.unsubscribe();
        }
    }
}

impl<T, U> Signal<U> for SingleSelectorInner<T, U>
where
    T: Clone + 'static,
    U: Clone + 'static,
{
    fn get(&self) -> U {
        if self.subscribers.is_empty() {
            // No live subscription keeps the cache fresh, so never trust it.
            self.fresh()
        } else {
            self.prime()
        }
    }

    fn subscribe(&self, callback: Callback<U>) -> Unsubscribe {
        // Attach first: the subscription echo refreshes a cache gone stale
        // while no subscriber was keeping it live.
        self.attach_upstream();
        let current = self.prime();

        (*callback)(&current);
        let id = self.subscribers.add(callback);

        let weak = self.self_ref.borrow().clone();
        Unsubscribe::new(move || {
            if let Some(me) = weak.upgrade() {
                if me.subscribers.remove(id) && me.subscribers.is_empty() {
                    me.release_upstream();
                }
            }
        })
    }

    fn count(&self) -> usize {
        self.subscribers.len()
    }
}

// =============================================================================
// SINGLE SELECTOR HANDLE
// =============================================================================

/// A read-only derived value over exactly one upstream signal.
///
/// Created with [`selector`](crate::selector). While unsubscribed, every read
/// recomputes against the latest upstream value; while subscribed, reads are
/// served from a cache kept fresh by a single upstream subscription, and
/// local subscribers are only notified when the derived output changes per
/// the equality policy.
pub struct SingleSelector<T, U> {
    inner: Rc<SingleSelectorInner<T, U>>,
}

impl<T, U> Clone for SingleSelector<T, U> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, U> SingleSelector<T, U>
where
    T: Clone + 'static,
    U: Clone + 'static,
{
    pub(crate) fn new(
        from: Rc<dyn Signal<T>>,
        getter: impl Fn(&T) -> U + 'static,
        equals: EqualsFn<U>,
    ) -> Self {
        let inner = Rc::new(SingleSelectorInner {
            from,
            getter: Box::new(getter),
            equals,
            value: RefCell::new(None),
            upstream: RefCell::new(None),
            subscribers: Rc::new(SubscriberSet::new()),
            self_ref: RefCell::new(Weak::new()),
        });
        *inner.self_ref.borrow_mut() = Rc::downgrade(&inner);
        Self { inner }
    }

    /// Current derived value.
    pub fn get(&self) -> U {
        self.inner.get()
    }

    /// Register a subscriber. Invoked once immediately with the current
    /// derived value, then on every change of the derived output.
    pub fn subscribe(&self, callback: impl Fn(&U) + 'static) -> Unsubscribe {
        self.inner.subscribe(Rc::new(callback))
    }

    /// Number of active local subscribers (diagnostic).
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// This selector as a type-erased read/subscribe handle, for composing
    /// further selectors on top of it.
    pub fn as_signal(&self) -> Rc<dyn Signal<U>> {
        self.inner.clone()
    }
}

impl<T, U> AsSignal<U> for SingleSelector<T, U>
where
    T: Clone + 'static,
    U: Clone + 'static,
{
    fn as_signal(&self) -> Rc<dyn Signal<U>> {
        self.inner.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
