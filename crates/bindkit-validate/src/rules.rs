#![forbid(unsafe_code)]

//! Stock rule predicates for text fields.
//!
//! These helpers cover the common cases a binding layer needs: presence and
//! length bounds. Length is measured in `char`s, matching what a view's
//! input length counter shows for the vast majority of inputs.
//!
//! The length and equality helpers fail closed on wrong-typed values: a
//! length rule applied to an `Int` field reports a validation failure
//! instead of silently passing, so a misconfigured gate is visible in the
//! UI rather than hidden. [`required`] is the exception — a non-text field
//! always holds a value, so it passes.

use bindkit_model::FieldValue;

/// Text must be present and not whitespace-only. Non-text values pass:
/// an `Int` or `Bool` field always holds a value.
#[must_use]
pub fn required(value: &FieldValue) -> bool {
    !value.is_blank()
}

/// Text length must be at least `min` chars.
pub fn min_length(min: usize) -> impl Fn(&FieldValue) -> bool {
    move |value| value.as_text().is_some_and(|s| s.chars().count() >= min)
}

/// Text length must be at most `max` chars.
pub fn max_length(max: usize) -> impl Fn(&FieldValue) -> bool {
    move |value| value.as_text().is_some_and(|s| s.chars().count() <= max)
}

/// Text length must be within `min..=max` chars.
pub fn length_between(min: usize, max: usize) -> impl Fn(&FieldValue) -> bool {
    move |value| {
        value.as_text().is_some_and(|s| {
            let len = s.chars().count();
            len >= min && len <= max
        })
    }
}

/// Text must equal `expected` exactly.
pub fn equals_text(expected: &'static str) -> impl Fn(&FieldValue) -> bool {
    move |value| value.as_text() == Some(expected)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
