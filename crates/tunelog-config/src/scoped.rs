//! ---
//! tl_section: "01-config-registry"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Typed runtime configuration variables and their registry."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use std::sync::Arc;

use crate::variable::AnyConfigVar;
use crate::{ConfigError, ConfigRegistry};

/// Guard that temporarily overrides a configuration variable.
///
/// On construction the variable is assigned the supplied textual value; when
/// the guard is dropped (or [`reset`](Self::reset) is called) the previous
/// value is restored. Mostly useful in tests and tooling that need to flip a
/// variable for the duration of one operation.
pub struct ScopedOverride {
    var: Option<Arc<dyn AnyConfigVar>>,
    previous: String,
}

impl ScopedOverride {
    /// Override `name` with `value` until the guard is dropped.
    pub fn new(registry: &ConfigRegistry, name: &str, value: &str) -> Result<Self, ConfigError> {
        let var = registry
            .lookup(name)
            .ok_or_else(|| ConfigError::UnknownName {
                name: name.to_owned(),
            })?;
        let previous = var.to_text();
        if !var.set_from_text(value) {
            return Err(ConfigError::Rejected {
                name: name.to_owned(),
                value: value.to_owned(),
            });
        }
        Ok(Self {
            var: Some(var),
            previous,
        })
    }

    /// The value the variable held before the override.
    pub fn previous(&self) -> &str {
        &self.previous
    }

    /// Restore the previous value now instead of at drop time.
    pub fn reset(&mut self) {
        if let Some(var) = self.var.take() {
            var.set_from_text(&self.previous);
        }
    }
}

impl Drop for ScopedOverride {
    fn drop(&mut self) {
        self.reset();
    }
}
