//! ---
//! tl_section: "02-logging-tree"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Hierarchical logger with configuration-driven levels."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
/// Emit a record on `$logger` at `$level`, capturing the call site.
///
/// The message is only formatted when the level is enabled for the logger.
#[macro_export]
macro_rules! tl_log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log(level, &format!($($arg)+), file!(), line!());
        }
    }};
}

/// Emit a fatal record; fatal records cannot be silenced by level.
#[macro_export]
macro_rules! tl_fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::tl_log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

/// Emit an error record.
#[macro_export]
macro_rules! tl_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::tl_log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Emit a warning record.
#[macro_export]
macro_rules! tl_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::tl_log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Emit an informational record.
#[macro_export]
macro_rules! tl_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::tl_log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Emit a verbose record.
#[macro_export]
macro_rules! tl_verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::tl_log!($logger, $crate::Level::Verbose, $($arg)+)
    };
}

/// Emit a debug record.
#[macro_export]
macro_rules! tl_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::tl_log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Emit a trace record.
#[macro_export]
macro_rules! tl_trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::tl_log!($logger, $crate::Level::Trace, $($arg)+)
    };
}
