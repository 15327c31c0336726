#![forbid(unsafe_code)]

//! Typed field values and per-entity-type accessor registries.
//!
//! Instead of resolving "which field changed" by reflecting into an object
//! at runtime, each entity type `E` registers a [`FieldRegistry<E>`] once:
//! an ordered table mapping a [`FieldName`] tag to a typed getter and setter
//! closure. Readers and writers that only know a field *name* (validation
//! gates, binding layers) go through the registry; typed code keeps using
//! `E`'s fields directly.
//!
//! # Invariants
//!
//! 1. Registration order is preserved and is the iteration order of
//!    [`FieldRegistry::names`].
//! 2. Setters reject wrong-variant writes with
//!    [`FieldError::TypeMismatch`]; the target field is left untouched.
//! 3. Getters and setters never perform I/O and never touch other fields.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown field | Name never registered | `FieldError::UnknownField` |
//! | Type mismatch | e.g. `Int` written to a `Text` field | `FieldError::TypeMismatch`, no write |
//! | Duplicate registration | Same name registered twice | First wins (`debug_assert!` in debug builds) |

/// Field-name tag. Field names are compile-time constants of the entity
/// type, so a `&'static str` avoids per-lookup allocation.
pub type FieldName = &'static str;

/// The value of a single named field, as seen by name-based consumers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    /// UTF-8 text.
    Text(String),
    /// Signed integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Boolean flag.
    Bool(bool),
}

impl FieldValue {
    /// Variant tag, used in type-mismatch errors.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Int(_) => FieldKind::Int,
            Self::Float(_) => FieldKind::Float,
            Self::Bool(_) => FieldKind::Bool,
        }
    }

    /// The text content, if this is a `Text` value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer content, if this is an `Int` value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float content, if this is a `Float` value.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// The boolean content, if this is a `Bool` value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether this is `Text` that is empty or whitespace-only.
    /// Non-text values are never blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Variant tag for [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    Text,
    Int,
    Float,
    Bool,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Errors from name-based field access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The name was never registered for this entity type.
    UnknownField(FieldName),
    /// The written value's variant does not match the field's type.
    TypeMismatch {
        field: FieldName,
        expected: FieldKind,
        got: FieldKind,
    },
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(name) => write!(f, "unknown field '{name}'"),
            Self::TypeMismatch {
                field,
                expected,
                got,
            } => write!(f, "field '{field}' expects {expected}, got {got}"),
        }
    }
}

impl std::error::Error for FieldError {}

type Getter<E> = Box<dyn Fn(&E) -> FieldValue>;
type Setter<E> = Box<dyn Fn(&mut E, FieldValue) -> Result<(), FieldError>>;

struct FieldSpec<E> {
    name: FieldName,
    kind: FieldKind,
    get: Getter<E>,
    set: Setter<E>,
}

/// Ordered name → typed-accessor table for one entity type.
///
/// Built once per entity type, usually at application setup, then shared
/// (via `Rc`) by every [`ObservableEntity`](crate::ObservableEntity) and
/// validation gate over that type.
///
/// # Example
///
/// ```
/// use bindkit_model::{FieldRegistry, FieldValue};
///
/// #[derive(Default)]
/// struct LoginForm {
///     username: String,
///     remember: bool,
/// }
///
/// let registry = FieldRegistry::new()
///     .text("username", |f: &LoginForm| f.username.clone(), |f, v| f.username = v)
///     .bool("remember", |f: &LoginForm| f.remember, |f, v| f.remember = v);
///
/// let mut form = LoginForm::default();
/// registry.write(&mut form, "username", FieldValue::Text("admin".into())).unwrap();
/// assert_eq!(form.username, "admin");
/// ```
pub struct FieldRegistry<E> {
    fields: Vec<FieldSpec<E>>,
}

impl<E> Default for FieldRegistry<E> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<E> std::fmt::Debug for FieldRegistry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("fields", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl<E> FieldRegistry<E> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    fn push(&mut self, spec: FieldSpec<E>) {
        debug_assert!(
            !self.contains(spec.name),
            "field '{}' registered twice",
            spec.name
        );
        if !self.contains(spec.name) {
            self.fields.push(spec);
        }
    }
}

// Registration helpers box their accessor closures, which requires the
// entity type to be owned (`'static`). Name-based access has no such need.
impl<E: 'static> FieldRegistry<E> {
    /// Register a text field.
    #[must_use]
    pub fn text(
        mut self,
        name: FieldName,
        get: impl Fn(&E) -> String + 'static,
        set: impl Fn(&mut E, String) + 'static,
    ) -> Self {
        self.push(FieldSpec {
            name,
            kind: FieldKind::Text,
            get: Box::new(move |e| FieldValue::Text(get(e))),
            set: Box::new(move |e, v| match v {
                FieldValue::Text(s) => {
                    set(e, s);
                    Ok(())
                }
                other => Err(FieldError::TypeMismatch {
                    field: name,
                    expected: FieldKind::Text,
                    got: other.kind(),
                }),
            }),
        });
        self
    }

    /// Register an integer field.
    #[must_use]
    pub fn int(
        mut self,
        name: FieldName,
        get: impl Fn(&E) -> i64 + 'static,
        set: impl Fn(&mut E, i64) + 'static,
    ) -> Self {
        self.push(FieldSpec {
            name,
            kind: FieldKind::Int,
            get: Box::new(move |e| FieldValue::Int(get(e))),
            set: Box::new(move |e, v| match v {
                FieldValue::Int(i) => {
                    set(e, i);
                    Ok(())
                }
                other => Err(FieldError::TypeMismatch {
                    field: name,
                    expected: FieldKind::Int,
                    got: other.kind(),
                }),
            }),
        });
        self
    }

    /// Register a float field.
    #[must_use]
    pub fn float(
        mut self,
        name: FieldName,
        get: impl Fn(&E) -> f64 + 'static,
        set: impl Fn(&mut E, f64) + 'static,
    ) -> Self {
        self.push(FieldSpec {
            name,
            kind: FieldKind::Float,
            get: Box::new(move |e| FieldValue::Float(get(e))),
            set: Box::new(move |e, v| match v {
                FieldValue::Float(x) => {
                    set(e, x);
                    Ok(())
                }
                other => Err(FieldError::TypeMismatch {
                    field: name,
                    expected: FieldKind::Float,
                    got: other.kind(),
                }),
            }),
        });
        self
    }

    /// Register a boolean field.
    #[must_use]
    pub fn bool(
        mut self,
        name: FieldName,
        get: impl Fn(&E) -> bool + 'static,
        set: impl Fn(&mut E, bool) + 'static,
    ) -> Self {
        self.push(FieldSpec {
            name,
            kind: FieldKind::Bool,
            get: Box::new(move |e| FieldValue::Bool(get(e))),
            set: Box::new(move |e, v| match v {
                FieldValue::Bool(b) => {
                    set(e, b);
                    Ok(())
                }
                other => Err(FieldError::TypeMismatch {
                    field: name,
                    expected: FieldKind::Bool,
                    got: other.kind(),
                }),
            }),
        });
        self
    }
}

impl<E> FieldRegistry<E> {
    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: FieldName) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Declared kind of a registered field.
    #[must_use]
    pub fn kind_of(&self, name: FieldName) -> Option<FieldKind> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.kind)
    }

    /// Registered field names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Number of registered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Read a field's current value by name.
    pub fn read(&self, entity: &E, name: FieldName) -> Result<FieldValue, FieldError> {
        let spec = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .ok_or(FieldError::UnknownField(name))?;
        Ok((spec.get)(entity))
    }

    /// Write a field by name. Rejects unknown names and wrong-variant
    /// values without touching the entity.
    pub fn write(&self, entity: &mut E, name: FieldName, value: FieldValue) -> Result<(), FieldError> {
        let spec = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .ok_or(FieldError::UnknownField(name))?;
        (spec.set)(entity, value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
