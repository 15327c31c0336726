#![forbid(unsafe_code)]

//! Change notification fan-out with explicit subscription handles.
//!
//! # Design
//!
//! [`ChangeNotifier`] keeps an ordered list of observer callbacks in shared,
//! reference-counted storage (`Rc<RefCell<..>>`). [`ChangeNotifier::notify`]
//! invokes every observer registered at call time with the name of the field
//! that changed, synchronously and in subscription order, before returning.
//!
//! Observers are addressed by [`SubscriptionId`] handles rather than RAII
//! guards: the view layer that registers a callback is also the layer that
//! decides when bindings are torn down, and an id can be stored, passed
//! around, and removed idempotently.
//!
//! # Performance
//!
//! | Operation       | Complexity                 |
//! |-----------------|----------------------------|
//! | `subscribe()`   | O(1) amortized             |
//! | `unsubscribe()` | O(S) where S = subscribers |
//! | `notify()`      | O(S)                       |
//!
//! # Failure Modes
//!
//! - **Observer panic**: a panicking callback propagates to the caller of
//!   `notify` (and therefore to the caller of `ObservableEntity::set`).
//!   Mutation is not panic-safe with respect to observers; later observers
//!   in the list are not invoked for that notification.
//! - **Re-entrant subscribe/unsubscribe**: permitted. The observer list is
//!   snapshotted before callbacks run, so list edits made from inside a
//!   callback take effect from the next notification onward.

use std::cell::RefCell;
use std::rc::Rc;

use crate::field::FieldName;

/// Handle identifying one registered observer callback.
///
/// Ids are unique per notifier and never reused, so a stale handle can be
/// passed to [`ChangeNotifier::unsubscribe`] safely (it is a no-op).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ChangeObserver = Rc<dyn Fn(FieldName)>;

struct NotifierInner {
    observers: Vec<(SubscriptionId, ChangeObserver)>,
    next_id: u64,
}

/// An ordered list of change observers with synchronous fan-out.
///
/// Cloning a `ChangeNotifier` creates a new handle to the **same** observer
/// list — subscriptions made through one handle are visible through all.
///
/// # Invariants
///
/// 1. Observers are invoked in subscription order.
/// 2. The same callback registered twice occupies two slots and is invoked
///    twice per notification (no deduplication).
/// 3. `unsubscribe` with an unknown or already-removed id is a no-op.
/// 4. `notify` delivers to the observers registered at the moment of the
///    call; re-entrant list edits affect only later notifications.
pub struct ChangeNotifier {
    inner: Rc<RefCell<NotifierInner>>,
}

impl Clone for ChangeNotifier {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ChangeNotifier")
            .field("observer_count", &inner.observers.len())
            .finish()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    /// Create a notifier with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(NotifierInner {
                observers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register an observer. The callback is invoked with the name of each
    /// field that changes, once per [`notify`](Self::notify) call.
    ///
    /// Registering the same callback twice yields two independent
    /// subscriptions; both fire on every notification.
    pub fn subscribe(&self, observer: impl Fn(FieldName) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.observers.push((id, Rc::new(observer)));
        id
    }

    /// Remove the observer registered under `id`. Removing an absent id is
    /// a no-op, not an error.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .borrow_mut()
            .observers
            .retain(|(sid, _)| *sid != id);
    }

    /// Invoke every currently registered observer with `field`, in
    /// subscription order, before returning.
    ///
    /// Delivery is synchronous and unbatched: each call stands alone.
    /// Callbacks run outside the internal borrow, so observers may
    /// subscribe, unsubscribe, or mutate the owning entity re-entrantly.
    pub fn notify(&self, field: FieldName) {
        // Snapshot so list edits from inside a callback do not affect this
        // delivery round.
        let observers: Vec<ChangeObserver> = {
            let inner = self.inner.borrow();
            inner.observers.iter().map(|(_, cb)| Rc::clone(cb)).collect()
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(field, observers = observers.len(), "change notification");

        for cb in &observers {
            cb(field);
        }
    }

    /// Number of currently registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn notify_reaches_subscriber() {
        let notifier = ChangeNotifier::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);

        notifier.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        notifier.notify("name");
        assert_eq!(count.get(), 1);

        notifier.notify("name");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn observer_receives_field_name() {
        let notifier = ChangeNotifier::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);

        notifier.subscribe(move |field| seen_clone.borrow_mut().push(field));

        notifier.notify("username");
        notifier.notify("password");
        assert_eq!(*seen.borrow(), vec!["username", "password"]);
    }

    #[test]
    fn subscription_order_is_delivery_order() {
        let notifier = ChangeNotifier::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log1 = Rc::clone(&log);
        notifier.subscribe(move |_| log1.borrow_mut().push('A'));
        let log2 = Rc::clone(&log);
        notifier.subscribe(move |_| log2.borrow_mut().push('B'));
        let log3 = Rc::clone(&log);
        notifier.subscribe(move |_| log3.borrow_mut().push('C'));

        notifier.notify("f");
        assert_eq!(*log.borrow(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn duplicate_registration_delivers_twice() {
        let notifier = ChangeNotifier::new();
        let count = Rc::new(Cell::new(0u32));

        let a = Rc::clone(&count);
        let first = notifier.subscribe(move |_| a.set(a.get() + 1));
        let b = Rc::clone(&count);
        let second = notifier.subscribe(move |_| b.set(b.get() + 1));
        assert_ne!(first, second);

        notifier.notify("f");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn unsubscribe_stops_future_deliveries() {
        let notifier = ChangeNotifier::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);

        let id = notifier.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        notifier.notify("f");
        assert_eq!(count.get(), 1);

        notifier.unsubscribe(id);

        notifier.notify("f");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unsubscribe_absent_id_is_noop() {
        let notifier = ChangeNotifier::new();
        let id = notifier.subscribe(|_| {});
        notifier.unsubscribe(id);
        // Second removal of the same id, and removal on an empty list.
        notifier.unsubscribe(id);
        assert_eq!(notifier.observer_count(), 0);
    }

    #[test]
    fn unsubscribe_one_of_two_duplicates() {
        let notifier = ChangeNotifier::new();
        let count = Rc::new(Cell::new(0u32));

        let a = Rc::clone(&count);
        let first = notifier.subscribe(move |_| a.set(a.get() + 1));
        let b = Rc::clone(&count);
        notifier.subscribe(move |_| b.set(b.get() + 1));

        notifier.unsubscribe(first);
        notifier.notify("f");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn clone_shares_observer_list() {
        let n1 = ChangeNotifier::new();
        let n2 = n1.clone();

        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        n1.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        n2.notify("f");
        assert_eq!(count.get(), 1);
        assert_eq!(n2.observer_count(), 1);
    }

    #[test]
    fn reentrant_unsubscribe_affects_next_round_only() {
        let notifier = ChangeNotifier::new();
        let count = Rc::new(Cell::new(0u32));

        let id_slot: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let notifier_handle = notifier.clone();
        let slot = Rc::clone(&id_slot);
        let count_clone = Rc::clone(&count);
        let id = notifier.subscribe(move |_| {
            count_clone.set(count_clone.get() + 1);
            if let Some(own) = slot.get() {
                notifier_handle.unsubscribe(own);
            }
        });
        id_slot.set(Some(id));

        // The callback removes itself mid-delivery; it still completes this
        // round and is gone for the next.
        notifier.notify("f");
        assert_eq!(count.get(), 1);
        notifier.notify("f");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn reentrant_subscribe_does_not_fire_same_round() {
        let notifier = ChangeNotifier::new();
        let late = Rc::new(Cell::new(0u32));

        let notifier_handle = notifier.clone();
        let late_clone = Rc::clone(&late);
        notifier.subscribe(move |_| {
            let inner_late = Rc::clone(&late_clone);
            notifier_handle.subscribe(move |_| inner_late.set(inner_late.get() + 1));
        });

        notifier.notify("f");
        assert_eq!(late.get(), 0);

        notifier.notify("f");
        assert_eq!(late.get(), 1);
    }

    #[test]
    fn observer_count_tracks_list() {
        let notifier = ChangeNotifier::new();
        assert_eq!(notifier.observer_count(), 0);
        let id = notifier.subscribe(|_| {});
        notifier.subscribe(|_| {});
        assert_eq!(notifier.observer_count(), 2);
        notifier.unsubscribe(id);
        assert_eq!(notifier.observer_count(), 1);
    }

    #[test]
    fn debug_format() {
        let notifier = ChangeNotifier::new();
        notifier.subscribe(|_| {});
        let dbg = format!("{notifier:?}");
        assert!(dbg.contains("ChangeNotifier"));
        assert!(dbg.contains("observer_count"));
    }
}
