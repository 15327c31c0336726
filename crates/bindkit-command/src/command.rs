#![forbid(unsafe_code)]

//! Command: action + guard + permission observers.
//!
//! # Design
//!
//! A [`Command<P>`] holds an action `FnMut(&P)`, an optional guard, and an
//! ordered permission-observer list, all behind a shared `Rc<RefCell<..>>`
//! handle (cloning a command clones the handle, not the command). The guard
//! is consulted fresh on every [`can_run`](Command::can_run); the command
//! caches nothing between calls.
//!
//! Guards come in two shapes. An infallible guard is a plain `Fn() -> bool`.
//! A fallible guard returns `Result<bool, GuardError>`; when it errors the
//! command **fails closed** — `can_run` reports `false` — rather than
//! propagating, since a broken guard should disable its action, not crash
//! the binding layer.
//!
//! # Failure Modes
//!
//! - **Re-entrant run**: calling `run()` on a command from inside its own
//!   action panics (RefCell borrow rules). Re-entrant activation of the
//!   same command indicates a binding-graph bug.
//! - **Observer panic**: propagates to the `notify_may_have_changed` caller;
//!   later observers are skipped for that round.

use std::cell::RefCell;
use std::rc::Rc;

/// Error produced by a fallible guard predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardError {
    message: String,
}

impl GuardError {
    /// Create a guard error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for GuardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "guard evaluation failed: {}", self.message)
    }
}

impl std::error::Error for GuardError {}

/// Handle identifying one registered permission observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

enum Guard {
    /// No guard: always permitted.
    Always,
    Infallible(Box<dyn Fn() -> bool>),
    Fallible(Box<dyn Fn() -> Result<bool, GuardError>>),
}

impl Guard {
    /// Evaluate the guard. A fallible guard that errors yields `false`.
    fn permitted(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Infallible(g) => g(),
            Self::Fallible(g) => match g() {
                Ok(permitted) => permitted,
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %_err, "guard failed, command disabled");
                    false
                }
            },
        }
    }
}

struct CommandInner<P> {
    action: Box<dyn FnMut(&P)>,
    guard: Guard,
    observers: Vec<(ObserverId, Rc<dyn Fn()>)>,
    next_id: u64,
}

/// A user-triggerable action with an enable/disable guard.
///
/// `P` is the activation parameter type; parameterless commands use the
/// default `P = ()` and [`trigger`](Command::trigger).
///
/// # Example
///
/// ```
/// use bindkit_command::Command;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let armed = Rc::new(Cell::new(false));
/// let fired = Rc::new(Cell::new(0u32));
///
/// let fired_by_action = Rc::clone(&fired);
/// let armed_for_guard = Rc::clone(&armed);
/// let command = Command::new(move |_: &()| fired_by_action.set(fired_by_action.get() + 1))
///     .with_guard(move || armed_for_guard.get());
///
/// assert!(!command.can_run());
/// assert!(!command.trigger()); // silent no-op
/// assert_eq!(fired.get(), 0);
///
/// armed.set(true);
/// command.notify_may_have_changed(); // tell bound views to re-ask can_run
/// assert!(command.can_run());
/// assert!(command.trigger());
/// assert_eq!(fired.get(), 1);
/// ```
pub struct Command<P = ()> {
    inner: Rc<RefCell<CommandInner<P>>>,
}

impl<P> Clone for Command<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P> std::fmt::Debug for Command<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Command")
            .field("observer_count", &inner.observers.len())
            .finish_non_exhaustive()
    }
}

impl<P: 'static> Command<P> {
    /// Create a command with no guard: always permitted to run.
    pub fn new(action: impl FnMut(&P) + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CommandInner {
                action: Box::new(action),
                guard: Guard::Always,
                observers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Attach a guard predicate. The guard is re-evaluated on every
    /// [`can_run`](Self::can_run); it should be a pure function of state
    /// it captures.
    #[must_use]
    pub fn with_guard(self, guard: impl Fn() -> bool + 'static) -> Self {
        self.inner.borrow_mut().guard = Guard::Infallible(Box::new(guard));
        self
    }

    /// Attach a guard that can itself fail. An `Err` disables the command
    /// (fail closed) instead of propagating.
    #[must_use]
    pub fn with_fallible_guard(
        self,
        guard: impl Fn() -> Result<bool, GuardError> + 'static,
    ) -> Self {
        self.inner.borrow_mut().guard = Guard::Fallible(Box::new(guard));
        self
    }

    /// Whether the action is currently permitted. Recomputed from the guard
    /// on every call; safe to call repeatedly.
    #[must_use]
    pub fn can_run(&self) -> bool {
        self.inner.borrow().guard.permitted()
    }

    /// Run the action if the guard currently permits it.
    ///
    /// Returns whether the action executed. When the guard says no, this is
    /// a silent no-op — callers are expected to consult
    /// [`can_run`](Self::can_run) first, and a caller that skips the check
    /// gets `false`, never an error.
    pub fn run(&self, parameter: &P) -> bool {
        if !self.can_run() {
            #[cfg(feature = "tracing")]
            tracing::trace!("command not permitted, run skipped");
            return false;
        }
        let mut inner = self.inner.borrow_mut();
        (inner.action)(parameter);
        true
    }

    /// Signal that the guard's verdict may have changed. Invokes every
    /// permission observer, in registration order, with no payload; the
    /// command computes nothing itself — observers re-ask
    /// [`can_run`](Self::can_run).
    pub fn notify_may_have_changed(&self) {
        let observers: Vec<Rc<dyn Fn()>> = {
            let inner = self.inner.borrow();
            inner.observers.iter().map(|(_, cb)| Rc::clone(cb)).collect()
        };
        for cb in &observers {
            cb();
        }
    }

    /// Register a permission observer, invoked on each
    /// [`notify_may_have_changed`](Self::notify_may_have_changed).
    /// Duplicate registrations fire independently.
    pub fn observe(&self, observer: impl Fn() + 'static) -> ObserverId {
        let mut inner = self.inner.borrow_mut();
        let id = ObserverId(inner.next_id);
        inner.next_id += 1;
        inner.observers.push((id, Rc::new(observer)));
        id
    }

    /// Remove a permission observer; an absent id is a no-op.
    pub fn unobserve(&self, id: ObserverId) {
        self.inner
            .borrow_mut()
            .observers
            .retain(|(oid, _)| *oid != id);
    }

    /// Number of registered permission observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

impl Command<()> {
    /// Run a parameterless command. Sugar for `run(&())`.
    pub fn trigger(&self) -> bool {
        self.run(&())
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
    fn unguarded_command_always_runs() {
        let fired = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&fired);
        let command = Command::new(move |_: &()| sink.set(sink.get() + 1));

        assert!(command.can_run());
        assert!(command.trigger());
        assert!(command.trigger());
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn guard_blocks_run_silently() {
        let fired = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&fired);
        let command =
            Command::new(move |_: &()| sink.set(sink.get() + 1)).with_guard(|| false);

        assert!(!command.can_run());
        assert!(!command.trigger());
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn guard_reevaluated_every_query() {
        let armed = Rc::new(Cell::new(false));
        let armed_for_guard = Rc::clone(&armed);
        let command =
            Command::new(|_: &()| {}).with_guard(move || armed_for_guard.get());

        assert!(!command.can_run());
        armed.set(true);
        // No notify needed for the value itself: can_run never caches.
        assert!(command.can_run());
        armed.set(false);
        assert!(!command.can_run());
    }

    #[test]
    fn can_run_deterministic_without_state_change() {
        let command = Command::new(|_: &()| {}).with_guard(|| true);
        assert_eq!(command.can_run(), command.can_run());
    }

    #[test]
    fn blocked_run_has_no_side_effects() {
        let fired = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&fired);
        let command =
            Command::new(move |_: &()| sink.set(sink.get() + 1)).with_guard(|| false);
        let observed = Rc::new(Cell::new(0u32));
        let observed_sink = Rc::clone(&observed);
        command.observe(move || observed_sink.set(observed_sink.get() + 1));

        assert!(!command.trigger());
        assert_eq!(fired.get(), 0);
        assert_eq!(observed.get(), 0);
        assert_eq!(command.observer_count(), 1);
    }

    #[test]
    fn parameter_reaches_action() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let command = Command::new(move |p: &String| sink.borrow_mut().push(p.clone()));

        assert!(command.run(&"alpha".to_string()));
        assert!(command.run(&"beta".to_string()));
        assert_eq!(*seen.borrow(), vec!["alpha", "beta"]);
    }

    #[test]
    fn fallible_guard_ok_permits() {
        let command = Command::new(|_: &()| {}).with_fallible_guard(|| Ok(true));
        assert!(command.can_run());
    }

    #[test]
    fn fallible_guard_error_fails_closed() {
        let fired = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&fired);
        let command = Command::new(move |_: &()| sink.set(sink.get() + 1))
            .with_fallible_guard(|| Err(GuardError::new("backend unreachable")));

        assert!(!command.can_run());
        assert!(!command.trigger());
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn notify_reaches_observers_in_order() {
        let command = Command::new(|_: &()| {});
        let log = Rc::new(RefCell::new(Vec::new()));

        let log1 = Rc::clone(&log);
        command.observe(move || log1.borrow_mut().push('A'));
        let log2 = Rc::clone(&log);
        command.observe(move || log2.borrow_mut().push('B'));

        command.notify_may_have_changed();
        assert_eq!(*log.borrow(), vec!['A', 'B']);

        command.notify_may_have_changed();
        assert_eq!(*log.borrow(), vec!['A', 'B', 'A', 'B']);
    }

    #[test]
    fn unobserve_stops_future_notifications() {
        let command = Command::new(|_: &()| {});
        let count = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&count);
        let id = command.observe(move || sink.set(sink.get() + 1));

        command.notify_may_have_changed();
        command.unobserve(id);
        command.notify_may_have_changed();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unobserve_absent_id_is_noop() {
        let command = Command::new(|_: &()| {});
        let id = command.observe(|| {});
        command.unobserve(id);
        command.unobserve(id);
        assert_eq!(command.observer_count(), 0);
    }

    #[test]
    fn notify_carries_no_verdict() {
        // Observers re-ask can_run; the notification itself computes nothing.
        let armed = Rc::new(Cell::new(false));
        let armed_for_guard = Rc::clone(&armed);
        let command = Command::new(|_: &()| {}).with_guard(move || armed_for_guard.get());

        let verdicts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&verdicts);
        let handle = command.clone();
        command.observe(move || sink.borrow_mut().push(handle.can_run()));

        command.notify_may_have_changed();
        armed.set(true);
        command.notify_may_have_changed();
        assert_eq!(*verdicts.borrow(), vec![false, true]);
    }

    #[test]
    fn clone_shares_command_state() {
        let fired = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&fired);
        let c1 = Command::new(move |_: &()| sink.set(sink.get() + 1));
        let c2 = c1.clone();

        assert!(c2.trigger());
        assert_eq!(fired.get(), 1);
        let id = c1.observe(|| {});
        assert_eq!(c2.observer_count(), 1);
        c2.unobserve(id);
        assert_eq!(c1.observer_count(), 0);
    }

    #[test]
    fn guard_error_display() {
        let err = GuardError::new("no session");
        assert_eq!(err.to_string(), "guard evaluation failed: no session");
        assert_eq!(err.message(), "no session");
    }
}
