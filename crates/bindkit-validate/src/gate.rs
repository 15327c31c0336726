#![forbid(unsafe_code)]

//! Validation gate: ordered rule sets over a shared field registry.
//!
//! # Design
//!
//! The gate shares the entity type's [`FieldRegistry`] and rejects rules for
//! unregistered fields at **registration** time ([`GateError::UnknownField`]),
//! so field lookup during validation cannot fail. Per-field evaluation
//! short-circuits on the first failing rule; whole-entity evaluation walks
//! the registry in registration order and never short-circuits across
//! fields (one field's failure does not block validating the others).
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Rule for unknown field | Name not in registry | `rule()` returns `GateError::UnknownField` |
//! | Rule fails | Predicate returns false | `ValidationFailure` with that rule's message |
//! | Field without rules | Nothing registered | Valid (vacuous) |
//! | Wrong-typed stock rule | e.g. length rule on an `Int` field | Rule fails (see [`crate::rules`]) |

use std::rc::Rc;

use bindkit_model::{FieldName, FieldRegistry, FieldValue, ObservableEntity};

/// A failed validation: which field, and what to display next to it.
///
/// This is expected, recoverable data for the view layer, not an exception;
/// it still implements `std::error::Error` for interop with `?`-style
/// callers that want to treat a failed submit as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationFailure {
    /// The offending field.
    pub field: FieldName,
    /// Human-readable message for display.
    pub message: String,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationFailure {}

/// Errors from gate configuration (not from validating values).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// A rule was registered for a field the registry does not know.
    UnknownField(FieldName),
}

impl std::fmt::Display for GateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(name) => {
                write!(f, "cannot register rule for unknown field '{name}'")
            }
        }
    }
}

impl std::error::Error for GateError {}

struct Rule {
    field: FieldName,
    message: String,
    check: Box<dyn Fn(&FieldValue) -> bool>,
}

/// Ordered per-field rule sets for one entity type.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use bindkit_model::{FieldRegistry, FieldValue, ObservableEntity};
/// use bindkit_validate::{ValidationGate, rules};
///
/// #[derive(Default, Clone)]
/// struct Form {
///     username: String,
/// }
///
/// let registry = Rc::new(FieldRegistry::new().text(
///     "username",
///     |f: &Form| f.username.clone(),
///     |f, v| f.username = v,
/// ));
///
/// let mut gate = ValidationGate::new(Rc::clone(&registry));
/// gate.rule("username", "Username is required", rules::required).unwrap();
///
/// let entity = ObservableEntity::new(Form::default(), registry);
/// let failure = gate.validate(&entity, "username").unwrap_err();
/// assert_eq!(failure.message, "Username is required");
///
/// entity.set("username", FieldValue::Text("admin".into())).unwrap();
/// assert!(gate.validate(&entity, "username").is_ok());
/// ```
pub struct ValidationGate<E> {
    registry: Rc<FieldRegistry<E>>,
    rules: Vec<Rule>,
}

impl<E> std::fmt::Debug for ValidationGate<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationGate")
            .field("rule_count", &self.rules.len())
            .field("fields", &self.registry.names().collect::<Vec<_>>())
            .finish()
    }
}

impl<E> ValidationGate<E> {
    /// Create a gate over the entity type's field registry.
    #[must_use]
    pub fn new(registry: Rc<FieldRegistry<E>>) -> Self {
        Self {
            registry,
            rules: Vec::new(),
        }
    }

    /// Register a rule for `field`. Rules for the same field run in
    /// registration order, and the first failure's message is the one
    /// reported — order is part of this gate's contract.
    ///
    /// The predicate must be pure: same value in, same verdict out, no
    /// mutation, no I/O.
    pub fn rule(
        &mut self,
        field: FieldName,
        message: impl Into<String>,
        check: impl Fn(&FieldValue) -> bool + 'static,
    ) -> Result<(), GateError> {
        if !self.registry.contains(field) {
            return Err(GateError::UnknownField(field));
        }
        self.rules.push(Rule {
            field,
            message: message.into(),
            check: Box::new(check),
        });
        Ok(())
    }

    /// Number of registered rules across all fields.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Validate one field of a typed state value.
    ///
    /// Evaluates the field's rules in registration order; returns the first
    /// failure, or `Ok(())` when every rule passes (or none exist).
    pub fn validate_value(&self, state: &E, field: FieldName) -> Result<(), ValidationFailure> {
        let mut rules = self.rules.iter().filter(|r| r.field == field).peekable();
        if rules.peek().is_none() {
            return Ok(());
        }
        // Rules only exist for registered fields (`rule()` checks), so the
        // read cannot fail here; treat the impossible case as vacuously valid.
        let Ok(value) = self.registry.read(state, field) else {
            return Ok(());
        };
        for rule in rules {
            if !(rule.check)(&value) {
                return Err(ValidationFailure {
                    field,
                    message: rule.message.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate one field of an observable entity.
    pub fn validate(
        &self,
        entity: &ObservableEntity<E>,
        field: FieldName,
    ) -> Result<(), ValidationFailure> {
        entity.with(|state| self.validate_value(state, field))
    }

    /// Validate every registered field, in registry order.
    pub fn validate_all_value(&self, state: &E) -> ValidationReport {
        let results = self
            .registry
            .names()
            .map(|field| (field, self.validate_value(state, field)))
            .collect();
        ValidationReport { results }
    }

    /// Validate every registered field of an observable entity.
    pub fn validate_all(&self, entity: &ObservableEntity<E>) -> ValidationReport {
        entity.with(|state| self.validate_all_value(state))
    }
}

/// Per-field results of a whole-entity validation pass, in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    results: Vec<(FieldName, Result<(), ValidationFailure>)>,
}

impl ValidationReport {
    /// Whether every field validated clean.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, r)| r.is_ok())
    }

    /// The failures, in registry order.
    pub fn failures(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.results.iter().filter_map(|(_, r)| r.as_ref().err())
    }

    /// Result for one field, if it was part of the pass.
    #[must_use]
    pub fn result_for(&self, field: FieldName) -> Option<&Result<(), ValidationFailure>> {
        self.results
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, r)| r)
    }

    /// All per-field results, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &Result<(), ValidationFailure>)> {
        self.results.iter().map(|(name, r)| (*name, r))
    }

    /// Number of fields covered by the pass.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the pass covered no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
