//! ---
//! tl_section: "02-logging-tree"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Hierarchical logger with configuration-driven levels."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use strum::{Display, EnumString};

/// Logger verbosity, ordered least to most verbose.
///
/// The five-character display forms keep formatted records column-aligned.
/// Parsing additionally accepts the full English names (`WARNING`, `INFO`,
/// `VERBOSE`), case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Level {
    /// Explicit silence marker; the mask policy never computes it, and
    /// fatal records are still emitted at this level.
    #[strum(to_string = "NONE")]
    None,
    /// Always emitted regardless of the logger's configured level.
    #[strum(to_string = "FATAL")]
    Fatal,
    /// Errors.
    #[strum(to_string = "ERROR")]
    Error,
    /// Warnings.
    #[strum(to_string = "WARNG", serialize = "WARNING")]
    Warning,
    /// Informational records.
    #[strum(to_string = "INFOR", serialize = "INFO")]
    Info,
    /// Chatty operational detail.
    #[strum(to_string = "VERBO", serialize = "VERBOSE")]
    Verbose,
    /// Debugging detail.
    #[strum(to_string = "DEBUG")]
    Debug,
    /// Finest-grained tracing.
    #[strum(to_string = "TRACE")]
    Trace,
}
