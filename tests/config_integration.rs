//! ---
//! tl_section: "04-testing-qa"
//! tl_subsection: "integration-tests"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Integration tests for the tunelog stack."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use tunelog_config::{AnyConfigVar, ConfigError, ConfigRegistry, ScopedOverride};

#[test]
fn textual_roundtrip_across_supported_types() {
    let registry = ConfigRegistry::new();
    let integer = registry.declare("app.int", -42i64, "", false).unwrap();
    let float = registry.declare("app.float", 2.5f64, "", false).unwrap();
    let flag = registry.declare("app.flag", true, "", false).unwrap();
    let text = registry
        .declare("app.text", String::from("hello"), "", false)
        .unwrap();

    assert!(registry.set_from_text("app.int", &integer.to_text()));
    assert!(registry.set_from_text("app.float", &float.to_text()));
    assert!(registry.set_from_text("app.flag", &flag.to_text()));
    assert!(registry.set_from_text("app.text", &text.to_text()));

    assert_eq!(integer.value(), -42);
    assert_eq!(float.value(), 2.5);
    assert!(flag.value());
    assert_eq!(text.value(), "hello");
}

#[test]
fn declaration_is_gated_by_the_name_grammar() {
    let registry = ConfigRegistry::new();
    for name in ["app.ok", "a", "a1.b2"] {
        assert!(registry.declare(name, 0i64, "", false).is_ok());
    }
    for name in ["App.bad", "app..bad", "app_", "9app", ""] {
        let result = registry.declare(name, 0i64, "", false);
        assert!(
            matches!(result, Err(ConfigError::InvalidName { .. })),
            "{name:?} must be rejected"
        );
        assert!(registry.lookup(name).is_none());
    }
}

#[test]
#[should_panic(expected = "declared more than once")]
fn redeclaring_a_name_is_fatal() {
    let registry = ConfigRegistry::new();
    registry.declare("app.once", 0i64, "", false).unwrap();
    let _ = registry.declare("app.once", String::new(), "", false);
}

#[test]
fn global_lock_freezes_lockable_variables_only() {
    let registry = ConfigRegistry::new();
    let guarded = registry
        .declare("app.guarded", 1i64, "frozen while locked", true)
        .unwrap();
    let open = registry.declare("app.open", 1i64, "", false).unwrap();

    registry.set_locked(true);
    assert!(!guarded.set(2));
    assert!(!registry.set_from_text("app.guarded", "2"));
    assert_eq!(guarded.value(), 1);
    assert!(open.set(2));
    assert!(registry.set_from_text("app.open", "3"));

    registry.set_locked(false);
    assert!(guarded.set(2));
    assert_eq!(guarded.value(), 2);
}

#[test]
fn environment_style_pairs_reach_dotted_variables() {
    let registry = ConfigRegistry::new();
    let mask = registry
        .declare("log.verbosemask", String::new(), "", false)
        .unwrap();
    let retries = registry.declare("app.retries", 1i64, "", false).unwrap();

    let accepted = registry.apply_pairs([
        ("LOG_VERBOSEMASK", "svc:.*"),
        ("APP_RETRIES", "5"),
        ("APP_UNDECLARED", "1"),
    ]);
    assert_eq!(accepted, 2);
    assert_eq!(mask.value(), "svc:.*");
    assert_eq!(retries.value(), 5);
}

#[test]
fn scoped_override_round_trips_through_text() {
    let registry = ConfigRegistry::new();
    let threshold = registry.declare("app.threshold", 10i64, "", false).unwrap();

    {
        let _guard = ScopedOverride::new(&registry, "app.threshold", "99").unwrap();
        assert_eq!(threshold.value(), 99);
    }
    assert_eq!(threshold.value(), 10);
}

#[test]
fn visit_exposes_descriptions_in_sorted_order() {
    let registry = ConfigRegistry::new();
    registry
        .declare("b.var", 0i64, "second description", false)
        .unwrap();
    registry
        .declare("a.var", 0i64, "first description", false)
        .unwrap();

    let mut seen = Vec::new();
    registry.visit_all(|var| seen.push((var.name().to_owned(), var.description().to_owned())));
    assert_eq!(
        seen,
        [
            ("a.var".to_owned(), "first description".to_owned()),
            ("b.var".to_owned(), "second description".to_owned()),
        ]
    );
}
