use posefx::{Action, ActionRegistry, FxConfig, HelpRow, RegistryError};

fn standard() -> ActionRegistry {
    ActionRegistry::standard(&FxConfig::default()).expect("standard table is valid")
}

#[test]
fn test_every_phrase_resolves_to_its_action() {
    let registry = standard();
    for action in registry.actions() {
        for phrase in action.phrases() {
            let resolved = registry.resolve_phrase(phrase).expect("phrase should resolve");
            assert_eq!(resolved.description(), action.description());
        }
    }
}

#[test]
fn test_unknown_phrases_do_not_resolve() {
    let registry = standard();
    for phrase in ["", "explode", "Freeze", "freeze ", "cannons", "start"] {
        assert!(registry.resolve_phrase(phrase).is_none(), "{phrase:?} should not resolve");
    }
}

#[test]
fn test_misheard_variants_are_aliases() {
    let registry = standard();
    for phrase in ["freeze", "fries", "priest", "trees"] {
        assert_eq!(registry.resolve_phrase(phrase).unwrap().description(), "Freeze");
    }
    for phrase in ["canon", "at cannon", "start canon"] {
        assert_eq!(registry.resolve_phrase(phrase).unwrap().description(), "Start cannon");
    }
}

#[test]
fn test_resolve_by_key() {
    let registry = standard();
    assert_eq!(registry.resolve_key("KeyR").unwrap().description(), "Reset effects");
    assert_eq!(registry.resolve_key("KeyC").unwrap().description(), "Start cannon");
    assert_eq!(registry.resolve_key("KeyH").unwrap().description(), "Show/hide controls");
    assert!(registry.resolve_key("KeyZ").is_none());
    assert!(registry.resolve_key("keyr").is_none());
}

#[test]
fn test_all_phrases_excludes_key_only_actions() {
    let registry = standard();
    let phrases = registry.all_phrases();

    let expected: usize = registry.actions().iter().map(|a| a.phrases().len()).sum();
    assert_eq!(phrases.len(), expected);
    assert_eq!(phrases.len(), 25);
    assert_eq!(phrases[0], "reset");
    assert!(phrases.contains(&"shut up"));
}

#[test]
fn test_duplicate_phrase_is_rejected() {
    let result = ActionRegistry::new(vec![
        Action::new("Freeze", "KeyF", &["freeze", "free"], |_| {}),
        Action::new("Release", "KeyL", &["let go", "free"], |_| {}),
    ]);

    assert_eq!(
        result.unwrap_err(),
        RegistryError::DuplicatePhrase {
            phrase: "free".to_string(),
            first: "Freeze".to_string(),
            second: "Release".to_string(),
        }
    );
}

#[test]
fn test_duplicate_phrase_within_one_action_is_rejected() {
    let result = ActionRegistry::new(vec![Action::new("Echo", "KeyE", &["echo", "echo"], |_| {})]);
    assert!(matches!(result, Err(RegistryError::DuplicatePhrase { .. })));
}

#[test]
fn test_duplicate_key_is_rejected() {
    let result = ActionRegistry::new(vec![
        Action::new("Cannon", "KeyC", &["cannon"], |_| {}),
        Action::new("Clear", "KeyC", &["clear"], |_| {}),
    ]);

    let err = result.unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateKey { .. }));
    assert_eq!(err.to_string(), "key KeyC is bound to both \"Cannon\" and \"Clear\"");
}

#[test]
fn test_empty_registry_resolves_nothing() {
    let registry = ActionRegistry::new(Vec::new()).unwrap();
    assert!(registry.all_phrases().is_empty());
    assert!(registry.resolve_phrase("reset").is_none());
}

#[test]
fn test_help_rows() {
    let rows = standard().help_rows();
    assert_eq!(rows.len(), 5);
    assert_eq!(
        rows[0],
        HelpRow {
            description: "Reset effects".to_string(),
            phrase: "reset".to_string(),
            key: "r".to_string(),
        }
    );
    assert_eq!(rows[4].phrase, "");
    assert_eq!(rows[4].key, "h");
}

#[test]
fn test_help_json_lists_every_action() {
    let json = standard().help_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[2]["phrase"], "start cannon");
    assert_eq!(rows[2]["key"], "c");
}

#[test]
fn test_key_label_without_prefix() {
    let action = Action::new("Space", "Space", &[], |_| {});
    assert_eq!(action.key_label(), "space");
}
