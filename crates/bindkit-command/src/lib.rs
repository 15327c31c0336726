#![forbid(unsafe_code)]

//! Guarded command objects for BindKit.
//!
//! A [`Command`] wraps a user-triggerable action together with an optional
//! guard predicate deciding whether the action is currently permitted. A
//! declarative view layer can bind to a command without knowing anything
//! about the action's implementation: it asks [`Command::can_run`] to decide
//! enablement, calls [`Command::run`] on activation, and registers a
//! permission observer to learn when `can_run` should be re-asked.
//!
//! Permission re-query is scoped per command: each command carries its own
//! observer list and [`Command::notify_may_have_changed`] broadcast, instead
//! of a process-wide "re-check everything" channel.
//!
//! # Invariants
//!
//! 1. `can_run()` re-evaluates the guard on every call; the result is never
//!    cached.
//! 2. `run()` under a false guard is a silent no-op, never an error.
//! 3. A guard that fails to evaluate fails **closed**: `can_run()` is false.
//! 4. Permission observers fire in registration order; removing an absent
//!    observer is a no-op.

pub mod command;

pub use command::{Command, GuardError, ObserverId};
