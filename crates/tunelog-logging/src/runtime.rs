//! ---
//! tl_section: "02-logging-tree"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Hierarchical logger with configuration-driven levels."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{trace, warn};
use tunelog_config::{ConfigError, ConfigRegistry, ConfigVarHandle};

use crate::level::Level;
use crate::logger::{Logger, LoggerTree};
use crate::policy::{MaskSet, MATCH_EVERYTHING, MATCH_NOTHING};
use crate::sink::{FileSink, LogSink, StdoutSink};

struct MaskVars {
    error: ConfigVarHandle<String>,
    warning: ConfigVarHandle<String>,
    info: ConfigVarHandle<String>,
    verbose: ConfigVarHandle<String>,
    debug: ConfigVarHandle<String>,
    trace: ConfigVarHandle<String>,
}

/// Glue between the configuration registry and the logger tree.
///
/// Declares the `log.*` variables, owns the tree, and keeps every logger's
/// level in sync with the six regex masks: whenever a mask changes, all
/// levels are recomputed. The `log.stdout` and `log.file` variables toggle
/// the built-in sinks on the root logger.
pub struct LogRuntime {
    tree: Arc<LoggerTree>,
    masks: MaskVars,
    stdout_sink: Mutex<Option<Arc<StdoutSink>>>,
    file_sink: Mutex<Option<Arc<FileSink>>>,
}

impl LogRuntime {
    /// Declare the built-in `log.*` variables on `registry` and wire their
    /// monitors. Because monitor registration fires immediately, every
    /// logger level is computed before this returns.
    ///
    /// # Panics
    ///
    /// Panics if any `log.*` variable is already declared, which happens
    /// when two runtimes are initialized against the same registry.
    pub fn init(registry: &ConfigRegistry) -> Result<Arc<Self>, ConfigError> {
        let masks = MaskVars {
            error: registry.declare(
                "log.errormask",
                MATCH_EVERYTHING.to_owned(),
                "Regex of loggers to enable error for.",
                false,
            )?,
            warning: registry.declare(
                "log.warnmask",
                MATCH_EVERYTHING.to_owned(),
                "Regex of loggers to enable warning for.",
                false,
            )?,
            info: registry.declare(
                "log.infomask",
                MATCH_EVERYTHING.to_owned(),
                "Regex of loggers to enable info for.",
                false,
            )?,
            verbose: registry.declare(
                "log.verbosemask",
                MATCH_NOTHING.to_owned(),
                "Regex of loggers to enable verbose for.",
                false,
            )?,
            debug: registry.declare(
                "log.debugmask",
                MATCH_NOTHING.to_owned(),
                "Regex of loggers to enable debugging for.",
                false,
            )?,
            trace: registry.declare(
                "log.tracemask",
                MATCH_NOTHING.to_owned(),
                "Regex of loggers to enable trace for.",
                false,
            )?,
        };
        let stdout_var = registry.declare("log.stdout", false, "Log to stdout", false)?;
        let file_var = registry.declare("log.file", String::new(), "Log to file", false)?;

        let mask_handles = [
            Arc::clone(&masks.error),
            Arc::clone(&masks.warning),
            Arc::clone(&masks.info),
            Arc::clone(&masks.verbose),
            Arc::clone(&masks.debug),
            Arc::clone(&masks.trace),
        ];

        let runtime = Arc::new(Self {
            tree: Arc::new(LoggerTree::new()),
            masks,
            stdout_sink: Mutex::new(None),
            file_sink: Mutex::new(None),
        });

        for handle in mask_handles {
            let rt = Arc::clone(&runtime);
            handle.monitor(move |_| rt.refresh_levels());
        }
        {
            let rt = Arc::clone(&runtime);
            stdout_var.monitor(move |enabled| rt.set_stdout_logging(*enabled));
        }
        {
            let rt = Arc::clone(&runtime);
            file_var.monitor(move |path| rt.set_file_logging(path));
        }

        Ok(runtime)
    }

    /// The logger tree driven by this runtime.
    pub fn tree(&self) -> &Arc<LoggerTree> {
        &self.tree
    }

    /// The root logger.
    pub fn root(&self) -> Arc<Logger> {
        self.tree.root()
    }

    /// Find or create the logger at `path`.
    ///
    /// Loggers created after the masks last changed start at the default
    /// level until the next recomputation; call [`refresh_levels`]
    /// (or touch a mask) to fold them in immediately.
    ///
    /// [`refresh_levels`]: Self::refresh_levels
    pub fn lookup(&self, path: &str) -> Arc<Logger> {
        self.tree.lookup(path)
    }

    /// Recompute every logger's level from the current mask values.
    pub fn refresh_levels(&self) {
        let masks = MaskSet::compile(
            &self.masks.error.value(),
            &self.masks.warning.value(),
            &self.masks.info.value(),
            &self.masks.verbose.value(),
            &self.masks.debug.value(),
            &self.masks.trace.value(),
        );
        masks.apply(&self.tree);
        trace!("logger levels recomputed from masks");
    }

    /// Severity shortcut: rewrite the six masks so that every logger lands
    /// exactly on `level`. Tiers up to and including `level` are set to
    /// match everything, the rest to match nothing. Levels below
    /// [`Level::Error`] are a no-op.
    ///
    /// Each underlying assignment triggers a recomputation of its own; the
    /// policy is idempotent and cheap, so the intermediate states are
    /// harmless.
    pub fn set_log_level(&self, level: Level) {
        if level < Level::Error {
            return;
        }
        let tiers: [(&ConfigVarHandle<String>, Level); 6] = [
            (&self.masks.error, Level::Error),
            (&self.masks.warning, Level::Warning),
            (&self.masks.info, Level::Info),
            (&self.masks.verbose, Level::Verbose),
            (&self.masks.debug, Level::Debug),
            (&self.masks.trace, Level::Trace),
        ];
        for (handle, tier) in tiers {
            let pattern = if tier <= level {
                MATCH_EVERYTHING
            } else {
                MATCH_NOTHING
            };
            handle.set(pattern.to_owned());
        }
    }

    fn set_stdout_logging(&self, enabled: bool) {
        let mut slot = self.stdout_sink.lock();
        match (slot.take(), enabled) {
            (Some(sink), false) => {
                self.root().remove_sink(&(sink as Arc<dyn LogSink>));
            }
            (None, true) => {
                let sink = Arc::new(StdoutSink::new());
                self.root().add_sink(Arc::clone(&sink) as Arc<dyn LogSink>);
                *slot = Some(sink);
            }
            (existing, _) => *slot = existing,
        }
    }

    fn set_file_logging(&self, path: &str) {
        let mut slot = self.file_sink.lock();
        if let Some(current) = slot.take() {
            if !path.is_empty() && current.path() == Path::new(path) {
                *slot = Some(current);
                return;
            }
            self.root().remove_sink(&(current as Arc<dyn LogSink>));
        }
        if path.is_empty() {
            return;
        }
        match FileSink::new(path) {
            Ok(sink) => {
                let sink = Arc::new(sink);
                self.root().add_sink(Arc::clone(&sink) as Arc<dyn LogSink>);
                *slot = Some(sink);
            }
            Err(err) => {
                // the variable keeps its value; only the sink is missing
                warn!(path, %err, "failed to open log file, file logging disabled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tunelog_config::AnyConfigVar;

    use super::*;

    #[test]
    fn init_declares_builtins_and_computes_default_levels() {
        let registry = ConfigRegistry::new();
        let runtime = LogRuntime::init(&registry).unwrap();

        for name in [
            "log.errormask",
            "log.warnmask",
            "log.infomask",
            "log.verbosemask",
            "log.debugmask",
            "log.tracemask",
            "log.stdout",
            "log.file",
        ] {
            assert!(registry.lookup(name).is_some(), "{name} must be declared");
        }
        assert_eq!(registry.lookup("log.errormask").unwrap().to_text(), ".*");
        assert_eq!(registry.lookup("log.stdout").unwrap().to_text(), "false");

        // default masks: error/warn/info match everything -> INFO
        assert_eq!(runtime.root().level(), Level::Info);
    }

    #[test]
    fn mask_change_drives_levels_live() {
        let registry = ConfigRegistry::new();
        let runtime = LogRuntime::init(&registry).unwrap();
        let api = runtime.lookup("svc:api");
        let other = runtime.lookup("other:api");
        runtime.refresh_levels();

        assert!(registry.set_from_text("log.verbosemask", "svc:.*"));
        assert_eq!(api.level(), Level::Verbose);
        assert_eq!(other.level(), Level::Info);
    }

    #[test]
    fn severity_shortcut_realizes_exact_threshold() {
        let registry = ConfigRegistry::new();
        let runtime = LogRuntime::init(&registry).unwrap();
        let logger = runtime.lookup("svc");
        runtime.refresh_levels();

        runtime.set_log_level(Level::Debug);
        assert_eq!(logger.level(), Level::Debug);
        assert_eq!(registry.lookup("log.debugmask").unwrap().to_text(), ".*");
        assert_eq!(registry.lookup("log.tracemask").unwrap().to_text(), "");

        runtime.set_log_level(Level::Error);
        assert_eq!(logger.level(), Level::Error);

        // below ERROR is a no-op
        runtime.set_log_level(Level::Fatal);
        assert_eq!(logger.level(), Level::Error);
    }

    #[test]
    fn malformed_mask_does_not_break_recomputation() {
        let registry = ConfigRegistry::new();
        let runtime = LogRuntime::init(&registry).unwrap();
        let logger = runtime.lookup("svc");
        runtime.refresh_levels();

        // value is stored even though the compiled effect falls back
        assert!(registry.set_from_text("log.debugmask", "(unclosed"));
        assert_eq!(registry.lookup("log.debugmask").unwrap().to_text(), "(unclosed");
        assert_eq!(logger.level(), Level::Info);
    }

    #[test]
    fn stdout_variable_toggles_root_sink() {
        let registry = ConfigRegistry::new();
        let runtime = LogRuntime::init(&registry).unwrap();

        assert!(registry.set_from_text("log.stdout", "true"));
        assert!(runtime.stdout_sink.lock().is_some());
        assert!(registry.set_from_text("log.stdout", "false"));
        assert!(runtime.stdout_sink.lock().is_none());
    }

    #[test]
    fn file_variable_attaches_and_detaches_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("svc.log");
        let registry = ConfigRegistry::new();
        let runtime = LogRuntime::init(&registry).unwrap();

        assert!(registry.set_from_text("log.file", path.to_str().unwrap()));
        {
            let slot = runtime.file_sink.lock();
            assert_eq!(slot.as_ref().unwrap().path(), path.as_path());
        }

        runtime
            .lookup("svc")
            .log(Level::Info, "to file", file!(), line!());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("to file"));

        assert!(registry.set_from_text("log.file", ""));
        assert!(runtime.file_sink.lock().is_none());
    }
}
