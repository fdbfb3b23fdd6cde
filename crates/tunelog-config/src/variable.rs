//! ---
//! tl_section: "01-config-registry"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Typed runtime configuration variables and their registry."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use std::any::Any;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Bounds every configuration value type must satisfy.
///
/// The textual accessors rely on the natural [`Display`]/[`FromStr`]
/// representation of the type, so `bool`, the integer types, floats and
/// `String` all qualify out of the box.
pub trait ConfigValue: Clone + PartialEq + FromStr + Display + Send + Sync + 'static {}

impl<T> ConfigValue for T where T: Clone + PartialEq + FromStr + Display + Send + Sync + 'static {}

/// Shared handle to a typed configuration variable, valid for the life of
/// the registry that declared it.
pub type ConfigVarHandle<T> = Arc<ConfigVar<T>>;

type MonitorFn<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct VarState<T> {
    value: T,
    monitor: Option<MonitorFn<T>>,
}

/// A single named, typed configuration value.
///
/// Mutation is serialized through a per-variable mutex; the registered
/// monitor is invoked outside the critical section so a callback that reads
/// the variable again does not deadlock. Re-entrant writes from inside a
/// monitor are not supported.
pub struct ConfigVar<T: ConfigValue> {
    name: String,
    description: String,
    lockable: bool,
    locked: Arc<AtomicBool>,
    state: Mutex<VarState<T>>,
}

impl<T: ConfigValue> ConfigVar<T> {
    pub(crate) fn new(
        name: impl Into<String>,
        default: T,
        description: impl Into<String>,
        lockable: bool,
        locked: Arc<AtomicBool>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            lockable,
            locked,
            state: Mutex::new(VarState {
                value: default,
                monitor: None,
            }),
        }
    }

    /// Clone of the current value.
    pub fn value(&self) -> T {
        self.state.lock().value.clone()
    }

    /// Replace the current value.
    ///
    /// Setting the value it already holds succeeds without notifying the
    /// monitor. A lockable variable refuses the write while the registry
    /// lock flag is raised and returns `false` with the value unchanged.
    /// Otherwise the value is stored, the monitor (if any) fires once with
    /// the new value, and the call returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut state = self.state.lock();
        if state.value == value {
            return true;
        }
        if self.lockable && self.locked.load(Ordering::SeqCst) {
            tracing::debug!(name = %self.name, "rejected write to locked variable");
            return false;
        }
        state.value = value.clone();
        let monitor = state.monitor.clone();
        drop(state);
        if let Some(monitor) = monitor {
            monitor(&value);
        }
        true
    }

    /// Register the change monitor, replacing any previous one, and invoke
    /// it immediately with the current value.
    ///
    /// The immediate invocation is load-bearing: subsystems that derive
    /// state from a variable (the logger level policy, sink toggles) use it
    /// to initialize themselves at registration time.
    pub fn monitor(&self, callback: impl Fn(&T) + Send + Sync + 'static) {
        let callback: MonitorFn<T> = Arc::new(callback);
        let mut state = self.state.lock();
        state.monitor = Some(Arc::clone(&callback));
        let current = state.value.clone();
        drop(state);
        callback(&current);
    }
}

/// Type-erased view of a [`ConfigVar`], the form the registry stores.
pub trait AnyConfigVar: Send + Sync {
    /// Immutable, validated variable name.
    fn name(&self) -> &str;
    /// Human-readable description supplied at declaration.
    fn description(&self) -> &str;
    /// Whether the registry lock flag freezes this variable.
    fn is_lockable(&self) -> bool;
    /// Render the current value through its natural text representation.
    fn to_text(&self) -> String;
    /// Parse and store a textual value; `false` on parse failure or lock
    /// rejection, in which case the current value is retained.
    fn set_from_text(&self, text: &str) -> bool;
    /// Upcast used to recover the concrete [`ConfigVar<T>`].
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: ConfigValue> AnyConfigVar for ConfigVar<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_lockable(&self) -> bool {
        self.lockable
    }

    fn to_text(&self) -> String {
        self.value().to_string()
    }

    fn set_from_text(&self, text: &str) -> bool {
        match text.parse::<T>() {
            Ok(value) => self.set(value),
            Err(_) => false,
        }
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn unlocked() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    fn var<T: ConfigValue>(default: T, lockable: bool, locked: Arc<AtomicBool>) -> ConfigVar<T> {
        ConfigVar::new("test.var", default, "test variable", lockable, locked)
    }

    #[test]
    fn unchanged_value_does_not_notify() {
        let hits = Arc::new(AtomicUsize::new(0));
        let variable = var(5i64, false, unlocked());
        let counter = Arc::clone(&hits);
        variable.monitor(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(hits.load(Ordering::SeqCst), 1, "registration fires once");

        assert!(variable.set(5));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(variable.set(6));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(variable.value(), 6);
    }

    #[test]
    fn monitor_replaces_previous_callback() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let variable = var(String::from("a"), false, unlocked());

        let counter = Arc::clone(&first);
        variable.monitor(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&second);
        variable.monitor(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        variable.set(String::from("b"));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn lockable_variable_rejects_writes_while_locked() {
        let locked = unlocked();
        let variable = var(1u32, true, Arc::clone(&locked));

        locked.store(true, Ordering::SeqCst);
        assert!(!variable.set(2));
        assert_eq!(variable.value(), 1);
        // setting the current value is still reported as success
        assert!(variable.set(1));

        locked.store(false, Ordering::SeqCst);
        assert!(variable.set(2));
        assert_eq!(variable.value(), 2);
    }

    #[test]
    fn textual_roundtrip_and_parse_failure() {
        let variable = var(10i64, false, unlocked());
        assert_eq!(variable.to_text(), "10");
        assert!(variable.set_from_text("42"));
        assert_eq!(variable.value(), 42);
        assert!(!variable.set_from_text("not a number"));
        assert_eq!(variable.value(), 42);
    }
}
