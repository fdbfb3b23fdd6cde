//! ---
//! tl_section: "01-config-registry"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Typed runtime configuration variables and their registry."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
//! Configuration variables are named, typed values that tune runtime behavior
//! without recompilation. Each variable is declared exactly once with a
//! default value and afterwards read or written either through its typed
//! handle or textually via the [`ConfigRegistry`]. Writes notify a registered
//! monitor callback, which is how dependent subsystems (notably the logger
//! level policy in `tunelog-logging`) react to changes live.
//!
//! Registries are plain owned values rather than hidden statics so tests can
//! construct isolated instances.

pub mod name;
pub mod registry;
pub mod scoped;
pub mod variable;

pub use name::{is_valid_name, normalize_key};
pub use registry::ConfigRegistry;
pub use scoped::ScopedOverride;
pub use variable::{AnyConfigVar, ConfigValue, ConfigVar, ConfigVarHandle};

/// Errors surfaced by the configuration subsystem.
///
/// Duplicate declaration is deliberately absent: declaring the same name
/// twice is a programming error and panics at the declaration site rather
/// than producing a recoverable error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The supplied name does not satisfy the variable-name grammar.
    #[error("invalid configuration variable name {name:?}")]
    InvalidName {
        /// The offending name.
        name: String,
    },
    /// No variable with the supplied name has been declared.
    #[error("unknown configuration variable {name:?}")]
    UnknownName {
        /// The name that was looked up.
        name: String,
    },
    /// A textual assignment was refused (parse failure or lock rejection).
    #[error("configuration variable {name:?} rejected value {value:?}")]
    Rejected {
        /// The variable that refused the assignment.
        name: String,
        /// The textual value that was refused.
        value: String,
    },
}
