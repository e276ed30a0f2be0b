//! Property tests for parsing and resolution.

use envscan_common::Mode;
use envscan_core::parse::{parse_env, parse_line};
use envscan_core::resolve::{Resolver, Source};
use envscan_core::scanner::{AppFileInfo, RawDefinition};
use envscan_model::RuleModel;
use proptest::prelude::*;
use std::path::PathBuf;

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][A-Z0-9_]{0,12}",
        Just("NEXT_PUBLIC_BILLING_PROVIDER".to_string()),
        Just("STRIPE_SECRET_KEY".to_string()),
        Just("NEXT_PUBLIC_SITE_URL".to_string()),
    ]
}

fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9_:/.-]{0,20}",
        Just("stripe".to_string()),
        Just("lemon-squeezy".to_string()),
        Just("sk_test_abc".to_string()),
    ]
}

fn source_strategy(mode: Mode) -> impl Strategy<Value = String> {
    prop::sample::select(mode.env_files()).prop_map(str::to_string)
}

fn definitions(mode: Mode) -> impl Strategy<Value = Vec<RawDefinition>> {
    prop::collection::vec(
        (key_strategy(), value_strategy(), source_strategy(mode)),
        0..24,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (key, value, source))| RawDefinition {
                key,
                value,
                source,
                line: i + 1,
            })
            .collect()
    })
}

fn mode_strategy() -> impl Strategy<Value = Mode> {
    prop::sample::select(Mode::ALL.to_vec())
}

fn app(variables: Vec<RawDefinition>) -> AppFileInfo {
    AppFileInfo {
        app_name: "web".to_string(),
        file_path: PathBuf::from("/repo/apps/web"),
        variables,
    }
}

proptest! {
    #[test]
    fn resolution_is_idempotent(
        (mode, defs) in mode_strategy().prop_flat_map(|m| (Just(m), definitions(m)))
    ) {
        let resolver = Resolver::builtin();
        let a = resolver.resolve(&app(defs.clone()), mode);
        let b = resolver.resolve(&app(defs), mode);
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn effective_source_has_highest_precedence(
        (mode, defs) in mode_strategy().prop_flat_map(|m| (Just(m), definitions(m)))
    ) {
        let state = Resolver::builtin().resolve(&app(defs), mode);
        for var in state.variables.values() {
            let Source::File(source) = &var.effective_source else {
                prop_assert!(var.definitions.is_empty());
                continue;
            };
            let winner = mode.precedence_of(source).unwrap();
            for d in &var.definitions {
                prop_assert!(mode.precedence_of(&d.source).unwrap() <= winner);
            }
            prop_assert_eq!(var.is_overridden, var.definitions.len() > 1);
            prop_assert_eq!(&var.effective_value, &var.definitions.last().unwrap().value);
        }
    }

    #[test]
    fn singleton_is_not_overridden(
        key in "[A-Z][A-Z0-9_]{0,12}",
        value in "[a-z0-9]{0,12}",
        source in source_strategy(Mode::Development),
    ) {
        let state = Resolver::builtin().resolve(
            &app(vec![RawDefinition { key: key.clone(), value, source, line: 1 }]),
            Mode::Development,
        );
        let var = state.get(&key).unwrap();
        prop_assert!(!var.is_overridden);
        prop_assert_eq!(var.definitions.len(), 1);
    }

    #[test]
    fn input_order_does_not_change_validation(
        (mode, defs) in mode_strategy().prop_flat_map(|m| (Just(m), definitions(m)))
    ) {
        // Reordering across keys must not change any outcome; order within a
        // key is kept because it decides same-file ties.
        let mut shuffled = defs.clone();
        shuffled.sort_by(|a, b| b.key.cmp(&a.key));
        let resolver = Resolver::builtin();
        let a = resolver.resolve(&app(defs), mode);
        let b = resolver.resolve(&app(shuffled), mode);
        for (key, var) in &a.variables {
            prop_assert_eq!(&var.validation, &b.variables[key].validation);
            prop_assert_eq!(&var.effective_value, &b.variables[key].effective_value);
        }
    }

    #[test]
    fn required_descriptors_always_present(
        (mode, defs) in mode_strategy().prop_flat_map(|m| (Just(m), definitions(m)))
    ) {
        let state = Resolver::builtin().resolve(&app(defs), mode);
        for d in RuleModel::builtin().iter().filter(|d| d.required) {
            let var = state.get(&d.name).unwrap();
            if var.effective_source.is_missing() {
                prop_assert!(!var.validation.success);
            }
        }
    }

    #[test]
    fn parser_never_panics(content in "(?s).{0,400}") {
        let defs = parse_env(&content, ".env");
        for d in defs {
            prop_assert!(!d.key.is_empty());
            prop_assert!(d.line >= 1);
        }
    }

    #[test]
    fn parse_plain_assignment(key in "[A-Z_][A-Z0-9_]{0,16}", value in "[a-z0-9 ]{0,16}") {
        let line = format!("{}={}", key, value);
        let (k, v) = parse_line(&line).unwrap();
        prop_assert_eq!(k, key);
        prop_assert_eq!(v, value.trim());
    }
}
