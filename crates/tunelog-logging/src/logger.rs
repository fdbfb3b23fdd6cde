//! ---
//! tl_section: "02-logging-tree"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Hierarchical logger with configuration-driven levels."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::Utc;
use parking_lot::RwLock;

use crate::level::Level;
use crate::sink::{LogRecord, LogSink};

/// Reserved name of the root logger.
pub const ROOT_NAME: &str = ":";

/// Process-local identifier for the calling thread, assigned on first use.
///
/// `std::thread::ThreadId` has no stable integer accessor, so records carry
/// this compact monotonic id instead.
pub fn current_thread_id() -> u64 {
    static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);
    thread_local! {
        static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
    }
    THREAD_ID.with(|id| *id)
}

struct LoggerState {
    level: Level,
    sinks: Vec<Arc<dyn LogSink>>,
    inherit_sinks: bool,
}

/// One node in the colon-separated logger namespace tree.
///
/// Nodes are created lazily by [`LoggerTree::lookup`] and never removed.
/// Level and sink list may be read and written from any thread; emission
/// snapshots the sink list before iterating it.
pub struct Logger {
    name: String,
    parent: Weak<Logger>,
    state: RwLock<LoggerState>,
    children: RwLock<BTreeMap<String, Arc<Logger>>>,
}

impl Logger {
    fn root() -> Arc<Self> {
        Arc::new(Self {
            name: ROOT_NAME.to_owned(),
            parent: Weak::new(),
            state: RwLock::new(LoggerState {
                level: Level::Info,
                sinks: Vec::new(),
                inherit_sinks: false,
            }),
            children: RwLock::new(BTreeMap::new()),
        })
    }

    fn node(name: &str, parent: &Arc<Logger>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            parent: Arc::downgrade(parent),
            state: RwLock::new(LoggerState {
                level: Level::Info,
                sinks: Vec::new(),
                inherit_sinks: true,
            }),
            children: RwLock::new(BTreeMap::new()),
        })
    }

    /// Get or create the direct child of `parent` holding `full_name`. Two
    /// threads racing on the same new name converge on a single node.
    fn child(parent: &Arc<Logger>, full_name: &str) -> Arc<Logger> {
        if let Some(existing) = parent.children.read().get(full_name) {
            return Arc::clone(existing);
        }
        let mut children = parent.children.write();
        Arc::clone(
            children
                .entry(full_name.to_owned())
                .or_insert_with(|| Logger::node(full_name, parent)),
        )
    }

    /// Full colon-separated name; the root is `":"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<Arc<Logger>> {
        self.parent.upgrade()
    }

    /// Current explicit level.
    pub fn level(&self) -> Level {
        self.state.read().level
    }

    /// Set the explicit level. With `propagate` the level is forced onto
    /// every descendant as well, overwriting their explicit levels.
    pub fn set_level(&self, level: Level, propagate: bool) {
        self.state.write().level = level;
        if propagate {
            for child in self.children.read().values() {
                child.set_level(level, true);
            }
        }
    }

    /// Whether records at `level` are emitted. Fatal records always are.
    pub fn enabled(&self, level: Level) -> bool {
        level == Level::Fatal || self.state.read().level >= level
    }

    /// Whether this node forwards records to its ancestors' sinks.
    pub fn inherit_sinks(&self) -> bool {
        self.state.read().inherit_sinks
    }

    /// Opt in or out of ancestor sink inheritance. A node that opts out
    /// forms a dispatch boundary for itself and its descendants' records.
    pub fn set_inherit_sinks(&self, inherit: bool) {
        self.state.write().inherit_sinks = inherit;
    }

    /// Attach a sink. Adding the same instance twice duplicates delivery.
    pub fn add_sink(&self, sink: Arc<dyn LogSink>) {
        self.state.write().sinks.push(sink);
    }

    /// Detach a previously attached sink instance; no-op when absent.
    pub fn remove_sink(&self, sink: &Arc<dyn LogSink>) {
        let mut state = self.state.write();
        if let Some(index) = state.sinks.iter().position(|s| Arc::ptr_eq(s, sink)) {
            state.sinks.remove(index);
        }
    }

    /// Detach every sink.
    pub fn clear_sinks(&self) {
        self.state.write().sinks.clear();
    }

    /// Emit a record.
    ///
    /// No-op when `message` is empty or `level` is not enabled. The record
    /// is delivered to this node's sinks and then walks the ancestor chain
    /// while each visited node's inherit flag is set; the root never
    /// inherits, so the walk always terminates. A record that reaches zero
    /// sinks is discarded.
    pub fn log(&self, level: Level, message: &str, file: &str, line: u32) {
        if message.is_empty() || !self.enabled(level) {
            return;
        }
        let record = LogRecord {
            logger: &self.name,
            timestamp_micros: Utc::now().timestamp_micros(),
            thread: current_thread_id(),
            level,
            message,
            file,
            line,
        };
        let mut inherit = self.dispatch(&record);
        let mut cursor = self.parent.upgrade();
        while inherit {
            let Some(node) = cursor else { break };
            inherit = node.dispatch(&record);
            cursor = node.parent.upgrade();
        }
    }

    /// Deliver `record` to this node's sinks (snapshot taken under the
    /// read lock) and report whether the walk continues upward.
    fn dispatch(&self, record: &LogRecord<'_>) -> bool {
        let (sinks, inherit) = {
            let state = self.state.read();
            (state.sinks.clone(), state.inherit_sinks)
        };
        for sink in &sinks {
            sink.log(record);
        }
        inherit
    }
}

/// Owner of the logger namespace tree.
pub struct LoggerTree {
    root: Arc<Logger>,
}

impl Default for LoggerTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerTree {
    /// Create a tree holding only the root node.
    pub fn new() -> Self {
        Self {
            root: Logger::root(),
        }
    }

    /// The root logger, named `":"`.
    pub fn root(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Find or create the logger at `path`.
    ///
    /// The path is split on `:` with empty segments discarded; an empty
    /// path or the literal `":"` yields the root. Intermediate nodes are
    /// created as needed, so `lookup("a:b:c")` materializes `a`, `a:b` and
    /// `a:b:c`. Repeated lookups return the identical node.
    pub fn lookup(&self, path: &str) -> Arc<Logger> {
        let mut node = Arc::clone(&self.root);
        let mut full_name = String::new();
        for segment in path.split(':').filter(|segment| !segment.is_empty()) {
            if !full_name.is_empty() {
                full_name.push(':');
            }
            full_name.push_str(segment);
            node = Logger::child(&node, &full_name);
        }
        node
    }

    /// Visit every node exactly once, breadth-first from the root.
    ///
    /// The callback may read node state but must not create loggers.
    pub fn visit_all(&self, mut f: impl FnMut(&Arc<Logger>)) {
        let mut queue = VecDeque::new();
        queue.push_back(Arc::clone(&self.root));
        while let Some(node) = queue.pop_front() {
            f(&node);
            for child in node.children.read().values() {
                queue.push_back(Arc::clone(child));
            }
        }
    }
}
