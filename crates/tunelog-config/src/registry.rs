//! ---
//! tl_section: "01-config-registry"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Typed runtime configuration variables and their registry."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::name::{is_valid_name, normalize_key};
use crate::variable::{AnyConfigVar, ConfigValue, ConfigVar, ConfigVarHandle};
use crate::ConfigError;

/// Registry owning every declared configuration variable.
///
/// Variables live for as long as the registry; callers hold shared handles.
/// Declarations typically happen during startup, but lookups and writes are
/// safe from arbitrarily many concurrent threads.
#[derive(Default)]
pub struct ConfigRegistry {
    vars: RwLock<BTreeMap<String, Arc<dyn AnyConfigVar>>>,
    locked: Arc<AtomicBool>,
}

impl ConfigRegistry {
    /// Create an empty, unlocked registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new variable with its default value.
    ///
    /// Returns [`ConfigError::InvalidName`] when `name` fails the name
    /// grammar.
    ///
    /// # Panics
    ///
    /// Panics if `name` has already been declared. Declaring a variable
    /// twice is a programming error, not a runtime condition.
    pub fn declare<T: ConfigValue>(
        &self,
        name: &str,
        default: T,
        description: &str,
        lockable: bool,
    ) -> Result<ConfigVarHandle<T>, ConfigError> {
        if !is_valid_name(name, true) {
            return Err(ConfigError::InvalidName {
                name: name.to_owned(),
            });
        }
        let mut vars = self.vars.write();
        assert!(
            !vars.contains_key(name),
            "configuration variable {name:?} declared more than once"
        );
        let var = Arc::new(ConfigVar::new(
            name,
            default,
            description,
            lockable,
            Arc::clone(&self.locked),
        ));
        vars.insert(name.to_owned(), Arc::clone(&var) as Arc<dyn AnyConfigVar>);
        debug!(name, lockable, "declared configuration variable");
        Ok(var)
    }

    /// Look up a previously declared variable regardless of its value type.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn AnyConfigVar>> {
        self.vars.read().get(name).cloned()
    }

    /// Look up a variable and recover its typed handle.
    ///
    /// Returns `None` when the name is unknown or was declared with a
    /// different value type.
    pub fn get<T: ConfigValue>(&self, name: &str) -> Option<ConfigVarHandle<T>> {
        self.lookup(name)?.as_any().downcast::<ConfigVar<T>>().ok()
    }

    /// Invoke `f` once per declared variable, in name order.
    ///
    /// The callback must not declare new variables; the registry read lock
    /// is held for the duration of the traversal.
    pub fn visit_all(&self, mut f: impl FnMut(&Arc<dyn AnyConfigVar>)) {
        for var in self.vars.read().values() {
            f(var);
        }
    }

    /// Raise or clear the global lock flag gating lockable variables.
    pub fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    /// Whether the global lock flag is currently raised.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    /// Assign a variable from its textual representation.
    ///
    /// `false` when the name is unknown or the variable refused the value
    /// (parse failure or lock rejection).
    pub fn set_from_text(&self, name: &str, text: &str) -> bool {
        match self.lookup(name) {
            Some(var) => var.set_from_text(text),
            None => false,
        }
    }

    /// Ingest externally supplied name/value pairs.
    ///
    /// Keys are normalized ([`normalize_key`]) before validation, so
    /// environment-style spellings such as `LOG_ERRORMASK` reach the
    /// variable `log.errormask`. Pairs with invalid or unknown keys and
    /// refused values are skipped. Returns the number of accepted pairs.
    pub fn apply_pairs<I, K, V>(&self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut accepted = 0;
        for (key, value) in pairs {
            let key = normalize_key(key.as_ref());
            if !is_valid_name(&key, true) {
                continue;
            }
            if self.set_from_text(&key, value.as_ref()) {
                accepted += 1;
            } else {
                debug!(key, "skipped configuration pair");
            }
        }
        accepted
    }
}
