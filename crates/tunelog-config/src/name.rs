//! ---
//! tl_section: "01-config-registry"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Typed runtime configuration variables and their registry."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use once_cell::sync::Lazy;
use regex::Regex;

static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-z][a-z0-9]*$").expect("valid name pattern"));
static NAME_DOTTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*(\.[a-z0-9]+)*$").expect("valid dotted name pattern"));

/// Check whether `name` is a valid configuration variable name.
///
/// With `allow_dot` the grammar is `[a-z][a-z0-9]*(\.[a-z0-9]+)*`, otherwise
/// a single undotted segment `[a-z][a-z0-9]*`.
pub fn is_valid_name(name: &str, allow_dot: bool) -> bool {
    if allow_dot {
        NAME_DOTTED.is_match(name)
    } else {
        NAME.is_match(name)
    }
}

/// Normalize an externally supplied key before validation.
///
/// Loaders that ingest name/value pairs from the environment or similar
/// sources must lower-case the key and translate `_` separators to `.`
/// before it is matched against the name grammar.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| match ch {
            '_' => '.',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
