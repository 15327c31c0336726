#![forbid(unsafe_code)]

//! BindKit: observable field models, guarded commands, and field validation
//! for declarative view bindings.
//!
//! This facade re-exports the three BindKit crates:
//!
//! - [`bindkit_model`] — [`ObservableEntity`], [`ChangeNotifier`],
//!   [`FieldRegistry`]: named fields whose mutation synchronously notifies
//!   registered observers.
//! - [`bindkit_command`] — [`Command`]: an action plus an optional guard,
//!   with per-command permission observers.
//! - [`bindkit_validate`] — [`ValidationGate`]: pure, per-field rule sets
//!   evaluated on demand, first failure wins.
//!
//! A view-model is plain composition: own an entity for the data, a command
//! per action, and let the view consult a gate per field. There is no base
//! type to inherit and no global registry — everything a view binds to is
//! an explicit value.
//!
//! ```
//! use std::rc::Rc;
//! use bindkit::{Command, FieldRegistry, FieldValue, ObservableEntity, ValidationGate, rules};
//!
//! #[derive(Default, Clone)]
//! struct LoginForm {
//!     username: String,
//!     password: String,
//! }
//!
//! let registry = Rc::new(
//!     FieldRegistry::new()
//!         .text("username", |f: &LoginForm| f.username.clone(), |f, v| f.username = v)
//!         .text("password", |f: &LoginForm| f.password.clone(), |f, v| f.password = v),
//! );
//!
//! let form = ObservableEntity::new(LoginForm::default(), Rc::clone(&registry));
//!
//! let mut gate = ValidationGate::new(registry);
//! gate.rule("username", "Username is required", rules::required).unwrap();
//!
//! let guard_form = form.clone();
//! let login = Command::new(|_: &()| { /* submit */ })
//!     .with_guard(move || guard_form.with(|f| !f.username.is_empty() && !f.password.is_empty()));
//!
//! assert!(gate.validate(&form, "username").is_err());
//! assert!(!login.can_run());
//!
//! form.set("username", FieldValue::Text("admin".into())).unwrap();
//! form.set("password", FieldValue::Text("sekret".into())).unwrap();
//! login.notify_may_have_changed();
//!
//! assert!(gate.validate(&form, "username").is_ok());
//! assert!(login.can_run());
//! assert!(login.trigger());
//! ```

pub use bindkit_command::{Command, GuardError, ObserverId};
pub use bindkit_model::{
    ChangeNotifier, FieldError, FieldKind, FieldName, FieldRegistry, FieldValue, ObservableEntity,
    SubscriptionId,
};
pub use bindkit_validate::{
    GateError, ValidationFailure, ValidationGate, ValidationReport, rules,
};
