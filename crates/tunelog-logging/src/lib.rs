//! ---
//! tl_section: "02-logging-tree"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Hierarchical logger with configuration-driven levels."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
//! Hierarchical logging whose verbosity is steered by configuration.
//!
//! Loggers form a namespace tree with colon-separated names (`svc:api:rest`
//! is a child of `svc:api`). A logger's level is not set directly: the
//! [`LogRuntime`] declares six regex mask variables (`log.errormask` through
//! `log.tracemask`) on a [`tunelog_config::ConfigRegistry`] and recomputes
//! every logger's level whenever any mask changes — the most verbose tier
//! whose mask matches a logger's full name wins. Records flow to the sinks
//! attached to the emitting node and, while nodes opt in to inheritance, to
//! those of its ancestors.
#![warn(missing_docs)]

pub mod level;
pub mod logger;
pub mod macros;
pub mod policy;
pub mod runtime;
pub mod sink;

pub use level::Level;
pub use logger::{current_thread_id, Logger, LoggerTree, ROOT_NAME};
pub use policy::{MaskSet, MATCH_EVERYTHING, MATCH_NOTHING};
pub use runtime::LogRuntime;
pub use sink::{FileSink, LogRecord, LogSink, StdoutSink};
