#![forbid(unsafe_code)]

//! Per-field validation for BindKit entities.
//!
//! A [`ValidationGate`] holds an ordered set of pure rules per field of one
//! entity type. The view layer asks the gate, per field and on demand,
//! whether the entity's current value is acceptable; the gate answers with
//! either success or a human-readable message to display next to the field.
//! Validation outcomes are **data, never errors**: a failing rule returns a
//! [`ValidationFailure`] value, it does not propagate.
//!
//! Rules see the field's [`FieldValue`](bindkit_model::FieldValue) and
//! nothing else — they cannot reach the entity, so they cannot mutate it,
//! and given the same value they always answer the same way.
//!
//! # Invariants
//!
//! 1. Rules for a field run in registration order; the first failure wins
//!    and later rules are skipped.
//! 2. A field with no rules is vacuously valid.
//! 3. Whole-entity validation is per-field validation applied to every
//!    registered field, in registry order; there is no cross-field
//!    composition.
//! 4. Validation is deterministic and performs no I/O.

pub mod gate;
pub mod rules;

pub use gate::{GateError, ValidationFailure, ValidationGate, ValidationReport};
