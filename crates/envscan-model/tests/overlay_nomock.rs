//! Rule overlays loaded from real files and merged into the catalog.

use envscan_common::Mode;
use envscan_model::{EffectiveValues, RuleError, RuleModel, RuleOverlay, ValidationContext};
use std::fs;
use tempfile::TempDir;

fn load(json: &str) -> Result<RuleModel, RuleError> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(&path, json).unwrap();
    let overlay = RuleOverlay::from_file(&path)?;
    RuleModel::builtin_owned().merge(overlay.into_descriptors()?)
}

#[test]
fn test_overlay_replaces_catalog_entry_in_place() {
    let builtin = RuleModel::builtin();
    let position = builtin
        .iter()
        .position(|d| d.name == "NEXT_PUBLIC_PRODUCT_NAME")
        .unwrap();

    let model = load(
        r#"{
            "schema_version": "1.0.0",
            "variables": [
                {"name": "NEXT_PUBLIC_PRODUCT_NAME", "category": "Site", "starts_with": ["Acme"]}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(model.len(), builtin.len());
    let replaced = model.iter().nth(position).unwrap();
    assert_eq!(replaced.name, "NEXT_PUBLIC_PRODUCT_NAME");
    assert!(!replaced.required);

    let values = EffectiveValues::new();
    let ctx = ValidationContext::new(&values, Mode::Development);
    let validator = replaced.validator().unwrap();
    assert!(validator.evaluate("Acme Cloud", &ctx).is_valid());
    assert!(!validator.evaluate("Other", &ctx).is_valid());
}

#[test]
fn test_overlay_dependency_on_catalog_variable() {
    let model = load(
        r#"{
            "schema_version": "1.0.0",
            "variables": [
                {"name": "PADDLE_API_KEY", "category": "Billing", "secret": true,
                 "required_when": {"variable": "NEXT_PUBLIC_BILLING_PROVIDER", "equals": "paddle",
                                   "message": "Paddle needs an API key."}}
            ]
        }"#,
    )
    .unwrap();

    let d = model.get("PADDLE_API_KEY").unwrap();
    assert!(d.secret);
    assert_eq!(d.dependency_names(), vec!["NEXT_PUBLIC_BILLING_PROVIDER"]);
    assert!(model.categories().contains(&"Billing"));
}

#[test]
fn test_overlay_unknown_dependency_rejected() {
    let err = load(
        r#"{
            "schema_version": "1.0.0",
            "variables": [
                {"name": "X", "required_when": {"variable": "DOES_NOT_EXIST"}}
            ]
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, RuleError::UnknownDependency { .. }));
    assert_eq!(err.code(), 33);
}

#[test]
fn test_overlay_unknown_field_rejected() {
    let err = load(
        r#"{"schema_version": "1.0.0", "variables": [{"name": "X", "mandatory": true}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, RuleError::ParseError(_)));
}

#[test]
fn test_overlay_missing_file() {
    let err = RuleOverlay::from_file(std::path::Path::new("/no/such/rules.json")).unwrap_err();
    assert!(matches!(err, RuleError::IoError(_)));
}
