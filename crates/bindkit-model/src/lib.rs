#![forbid(unsafe_code)]

//! Observable field model for BindKit.
//!
//! This crate provides the data half of the view-model binding mechanism:
//!
//! - [`ChangeNotifier`]: an ordered observer list that fans out field-name
//!   change notifications synchronously, in subscription order.
//! - [`FieldRegistry`]: a per-entity-type mapping from field name to typed
//!   getter/setter accessors, replacing string reflection.
//! - [`ObservableEntity`]: typed state composed with a registry and a
//!   notifier, so every named-field mutation is followed by exactly one
//!   change notification before control returns to the caller.
//!
//! # Architecture
//!
//! All handles use `Rc<RefCell<..>>` for single-threaded shared ownership:
//! cloning an [`ObservableEntity`] or [`ChangeNotifier`] yields another
//! handle to the **same** state and observer list. Nothing in this crate is
//! `Send` or `Sync`; a host with a dedicated UI-affinity thread must marshal
//! cross-thread calls before touching an entity.
//!
//! # Invariants
//!
//! 1. A successful [`ObservableEntity::set`] fires exactly one notification,
//!    naming the mutated field, before `set` returns.
//! 2. Observers are notified in subscription order; an observer subscribed
//!    twice is notified twice.
//! 3. Removing a subscription that was never added (or already removed) is
//!    a no-op.
//! 4. A failed write (unknown field, type mismatch) notifies nobody.

pub mod entity;
pub mod field;
pub mod notifier;

pub use entity::ObservableEntity;
pub use field::{FieldError, FieldKind, FieldName, FieldRegistry, FieldValue};
pub use notifier::{ChangeNotifier, SubscriptionId};
