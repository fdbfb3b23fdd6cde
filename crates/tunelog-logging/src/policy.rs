//! ---
//! tl_section: "02-logging-tree"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Hierarchical logger with configuration-driven levels."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use regex::Regex;
use tracing::warn;

use crate::level::Level;
use crate::logger::LoggerTree;

/// Mask pattern matching every logger name.
pub const MATCH_EVERYTHING: &str = ".*";
/// Mask pattern matching no logger name (the empty pattern only matches the
/// empty string, and no logger has an empty name).
pub const MATCH_NOTHING: &str = "";

/// The six compiled level masks, one per verbosity tier above fatal.
///
/// Each mask is matched against a logger's full name with whole-string
/// semantics. Evaluation escalates monotonically: a name matched by a more
/// verbose tier ends up at that tier no matter what the less verbose masks
/// said.
pub struct MaskSet {
    tiers: [(Level, Regex); 6],
}

impl MaskSet {
    /// Compile the six tier patterns.
    ///
    /// A pattern that fails to compile is replaced by its tier's safe
    /// default: error/warn/info fall back to [`MATCH_EVERYTHING`], the more
    /// verbose tiers to [`MATCH_NOTHING`]. Malformed input therefore
    /// degrades loudly (everything at the coarse tiers) instead of going
    /// silent.
    pub fn compile(
        error: &str,
        warning: &str,
        info: &str,
        verbose: &str,
        debug: &str,
        trace: &str,
    ) -> Self {
        Self {
            tiers: [
                (Level::Error, compile_mask(error, MATCH_EVERYTHING)),
                (Level::Warning, compile_mask(warning, MATCH_EVERYTHING)),
                (Level::Info, compile_mask(info, MATCH_EVERYTHING)),
                (Level::Verbose, compile_mask(verbose, MATCH_NOTHING)),
                (Level::Debug, compile_mask(debug, MATCH_NOTHING)),
                (Level::Trace, compile_mask(trace, MATCH_NOTHING)),
            ],
        }
    }

    /// Level for a logger named `name`: starts at fatal and is raised by
    /// every matching tier, most verbose match winning.
    pub fn compute_level(&self, name: &str) -> Level {
        let mut level = Level::Fatal;
        for (tier, mask) in &self.tiers {
            if mask.is_match(name) {
                level = *tier;
            }
        }
        level
    }

    /// Recompute and apply the level of every logger in `tree`.
    ///
    /// Each node is matched by its own full name; nothing propagates. Nodes
    /// whose computed level equals their current one are left untouched.
    pub fn apply(&self, tree: &LoggerTree) {
        tree.visit_all(|node| {
            let computed = self.compute_level(node.name());
            if node.level() != computed {
                node.set_level(computed, false);
            }
        });
    }
}

fn compile_mask(pattern: &str, fallback: &str) -> Regex {
    match Regex::new(&anchor(pattern)) {
        Ok(mask) => mask,
        Err(err) => {
            warn!(pattern, %err, "level mask failed to compile, using tier default");
            Regex::new(&anchor(fallback)).expect("tier default mask compiles")
        }
    }
}

// Whole-string matching: `a` must not match logger `a:b`.
fn anchor(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}
