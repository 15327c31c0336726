#![forbid(unsafe_code)]

//! Observable entity: typed state composed with a registry and a notifier.
//!
//! # Design
//!
//! [`ObservableEntity<E>`] owns its notification plumbing by composition
//! rather than inheriting it from a shared base: the entity holds typed
//! state `E`, a shared [`FieldRegistry<E>`] for name-based access, and a
//! [`ChangeNotifier`] for fan-out. Cloning an entity creates another handle
//! to the **same** state, registry, and observer list.
//!
//! # Invariants
//!
//! 1. A successful [`set`](ObservableEntity::set) performs exactly one write
//!    followed by exactly one notification naming the written field, before
//!    `set` returns. The notification fires even when the new value equals
//!    the old (use [`set_if_changed`](ObservableEntity::set_if_changed) to
//!    opt into equality skipping).
//! 2. A failed write notifies nobody and leaves the state untouched.
//! 3. Notifications are delivered synchronously, in subscription order, on
//!    the caller's thread. There is no batching across calls.
//!
//! # Failure Modes
//!
//! - **Observer panic**: propagates out of `set`. The write itself has
//!   already happened; observers later in the list are skipped for that
//!   notification. Mutation is not panic-safe with respect to observers.
//! - **Re-entrant mutation**: an observer may call `set` on the same entity;
//!   the state borrow is released before fan-out. Each nested `set` runs its
//!   own full write-then-notify cycle.

use std::cell::RefCell;
use std::rc::Rc;

use crate::field::{FieldError, FieldName, FieldRegistry, FieldValue};
use crate::notifier::{ChangeNotifier, SubscriptionId};

/// A mutable record of named, independently observable fields.
///
/// # Example
///
/// ```
/// use bindkit_model::{FieldRegistry, FieldValue, ObservableEntity};
///
/// #[derive(Default, Clone)]
/// struct Form {
///     username: String,
/// }
///
/// let registry = FieldRegistry::new().text(
///     "username",
///     |f: &Form| f.username.clone(),
///     |f, v| f.username = v,
/// );
/// let entity = ObservableEntity::new(Form::default(), registry);
///
/// let id = entity.subscribe(|field| assert_eq!(field, "username"));
/// entity.set("username", FieldValue::Text("admin".into())).unwrap();
/// assert_eq!(entity.get("username").unwrap(), FieldValue::Text("admin".into()));
/// entity.unsubscribe(id);
/// ```
pub struct ObservableEntity<E> {
    state: Rc<RefCell<E>>,
    registry: Rc<FieldRegistry<E>>,
    notifier: ChangeNotifier,
}

impl<E> Clone for ObservableEntity<E> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            registry: Rc::clone(&self.registry),
            notifier: self.notifier.clone(),
        }
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for ObservableEntity<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableEntity")
            .field("state", &*self.state.borrow())
            .field("fields", &self.registry.names().collect::<Vec<_>>())
            .field("observer_count", &self.notifier.observer_count())
            .finish()
    }
}

impl<E> ObservableEntity<E> {
    /// Create an entity over `state`. The registry is usually built once per
    /// entity type and shared; both `FieldRegistry<E>` and
    /// `Rc<FieldRegistry<E>>` are accepted.
    pub fn new(state: E, registry: impl Into<Rc<FieldRegistry<E>>>) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
            registry: registry.into(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Write `value` to the named field, then notify every observer with
    /// the field name before returning.
    ///
    /// The write is unconditional: setting a field to its current value
    /// still notifies. Unknown names and wrong-variant values fail without
    /// notifying anyone.
    pub fn set(&self, field: FieldName, value: FieldValue) -> Result<(), FieldError> {
        {
            let mut state = self.state.borrow_mut();
            self.registry.write(&mut state, field, value)?;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(field, "field set");
        self.notifier.notify(field);
        Ok(())
    }

    /// Like [`set`](Self::set), but skips the notification when the new
    /// value equals the current one. Returns whether a notification fired.
    pub fn set_if_changed(&self, field: FieldName, value: FieldValue) -> Result<bool, FieldError> {
        let changed = {
            let mut state = self.state.borrow_mut();
            let old = self.registry.read(&state, field)?;
            if old == value {
                false
            } else {
                self.registry.write(&mut state, field, value)?;
                true
            }
        };
        if changed {
            self.notifier.notify(field);
        }
        Ok(changed)
    }

    /// Mutate the typed state in place, then fire one notification for
    /// `field`. The caller asserts which field the closure changed; the
    /// name does not need to be registered.
    pub fn update(&self, field: FieldName, f: impl FnOnce(&mut E)) {
        {
            let mut state = self.state.borrow_mut();
            f(&mut state);
        }
        self.notifier.notify(field);
    }

    /// Read a field's current value by name.
    pub fn get(&self, field: FieldName) -> Result<FieldValue, FieldError> {
        self.registry.read(&self.state.borrow(), field)
    }

    /// Access the typed state by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Clone of the typed state.
    #[must_use]
    pub fn snapshot(&self) -> E
    where
        E: Clone,
    {
        self.state.borrow().clone()
    }

    /// Register a change observer. See [`ChangeNotifier::subscribe`].
    pub fn subscribe(&self, observer: impl Fn(FieldName) + 'static) -> SubscriptionId {
        self.notifier.subscribe(observer)
    }

    /// Remove a change observer; absent ids are a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.notifier.unsubscribe(id);
    }

    /// The entity's notifier handle (shares the observer list).
    #[must_use]
    pub fn notifier(&self) -> ChangeNotifier {
        self.notifier.clone()
    }

    /// The entity's field registry.
    #[must_use]
    pub fn registry(&self) -> Rc<FieldRegistry<E>> {
        Rc::clone(&self.registry)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
