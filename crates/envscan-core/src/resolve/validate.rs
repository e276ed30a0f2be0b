//! Tiered validation of one resolved key.
//!
//! Tiers are checked in order and the first that applies decides:
//!
//! 1. required and empty: fail with [`REQUIRED_MISSING`]
//! 2. contextual rule: valid while inactive; when active, an empty value
//!    fails with the active dependencies' messages and a present value goes
//!    through the rule's validator
//! 3. plain validator on a non-empty value
//! 4. otherwise valid
//!
//! A validator that panics is a bug in the rule table and is not caught.

use envscan_model::{Validation, ValidationContext, VariableDescriptor};

pub const REQUIRED_MISSING: &str =
    "This variable is required but missing from your environment files.";

/// Validate `value` against `descriptor`. Undeclared keys are always valid.
pub fn evaluate(
    descriptor: Option<&VariableDescriptor>,
    value: &str,
    ctx: &ValidationContext<'_>,
) -> Validation {
    let Some(descriptor) = descriptor else {
        return Validation::valid();
    };

    if descriptor.required && value.is_empty() {
        return Validation::invalid(REQUIRED_MISSING);
    }

    if let Some(contextual) = descriptor.contextual_validation() {
        let active = contextual.active_dependencies(ctx);
        if active.is_empty() {
            return Validation::valid();
        }
        if value.is_empty() {
            let issues = active
                .iter()
                .map(|dep| dep.message.clone())
                .filter(|m| !m.is_empty())
                .collect();
            return Validation::from_issues(issues);
        }
        return contextual.validate(value, ctx);
    }

    match descriptor.validator() {
        Some(validator) if !value.is_empty() => validator.evaluate(value, ctx),
        _ => Validation::valid(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envscan_common::Mode;
    use envscan_model::validator::from_fn;
    use envscan_model::{
        validators, ContextualValidation, Dependency, EffectiveValues, VariableType,
    };

    fn ctx(values: &EffectiveValues) -> ValidationContext<'_> {
        ValidationContext::new(values, Mode::Development)
    }

    fn stripe_key() -> VariableDescriptor {
        VariableDescriptor::new("STRIPE_SECRET_KEY", "Billing", VariableType::String).contextual(
            ContextualValidation::new(
                vec![Dependency::when_equals("PROVIDER", "stripe", "Stripe key needed")],
                validators::starts_with(&["sk_"], "Stripe secret key"),
            ),
        )
    }

    #[test]
    fn test_undeclared_is_valid() {
        let values = EffectiveValues::new();
        assert!(evaluate(None, "", &ctx(&values)).is_valid());
    }

    #[test]
    fn test_required_missing() {
        let d = VariableDescriptor::new("URL", "Site", VariableType::Url).required();
        let values = EffectiveValues::new();
        let result = evaluate(Some(&d), "", &ctx(&values));
        assert_eq!(result.issues(), &[REQUIRED_MISSING.to_string()]);
    }

    #[test]
    fn test_required_present_runs_plain_validator() {
        let d = VariableDescriptor::new("URL", "Site", VariableType::Url)
            .required()
            .validate(validators::url());
        let values = EffectiveValues::new();
        assert!(!evaluate(Some(&d), "nope", &ctx(&values)).is_valid());
        assert!(evaluate(Some(&d), "https://x.dev", &ctx(&values)).is_valid());
    }

    #[test]
    fn test_contextual_inactive_is_valid_even_if_empty() {
        let mut values = EffectiveValues::new();
        values.insert("PROVIDER".into(), "lemon-squeezy".into());
        assert!(evaluate(Some(&stripe_key()), "", &ctx(&values)).is_valid());
        // The rule's validator is not consulted while inactive.
        assert!(evaluate(Some(&stripe_key()), "garbage", &ctx(&values)).is_valid());
    }

    #[test]
    fn test_contextual_active_and_empty_uses_dependency_messages() {
        let mut values = EffectiveValues::new();
        values.insert("PROVIDER".into(), "stripe".into());
        let result = evaluate(Some(&stripe_key()), "", &ctx(&values));
        assert_eq!(result.issues(), &["Stripe key needed".to_string()]);
    }

    #[test]
    fn test_contextual_active_and_present_runs_rule() {
        let mut values = EffectiveValues::new();
        values.insert("PROVIDER".into(), "stripe".into());
        assert!(evaluate(Some(&stripe_key()), "sk_test_abc", &ctx(&values)).is_valid());
        let result = evaluate(Some(&stripe_key()), "pk_test_abc", &ctx(&values));
        assert_eq!(
            result.issues(),
            &["Stripe secret key must start with 'sk_'".to_string()]
        );
    }

    #[test]
    fn test_contextual_empty_messages_do_not_fail() {
        let d = VariableDescriptor::new("K", "X", VariableType::String).contextual(
            ContextualValidation::new(
                vec![Dependency::when_set("P", "")],
                from_fn(|_, _| Validation::invalid("never reached")),
            ),
        );
        let mut values = EffectiveValues::new();
        values.insert("P".into(), "on".into());
        assert!(evaluate(Some(&d), "", &ctx(&values)).is_valid());
    }

    #[test]
    fn test_contextual_or_across_dependencies() {
        let d = VariableDescriptor::new("K", "X", VariableType::String).contextual(
            ContextualValidation::new(
                vec![
                    Dependency::when_set("A", "needed for A"),
                    Dependency::when_set("B", "needed for B"),
                ],
                from_fn(|_, _| Validation::valid()),
            ),
        );
        let mut values = EffectiveValues::new();
        values.insert("A".into(), "1".into());
        values.insert("B".into(), "1".into());
        let result = evaluate(Some(&d), "", &ctx(&values));
        assert_eq!(result.issues().len(), 2);

        values.insert("A".into(), String::new());
        let result = evaluate(Some(&d), "", &ctx(&values));
        assert_eq!(result.issues(), &["needed for B".to_string()]);
    }

    #[test]
    fn test_plain_validator_skipped_for_empty_value() {
        let d = VariableDescriptor::new("PORT", "Mailer", VariableType::Number)
            .validate(validators::port());
        let values = EffectiveValues::new();
        assert!(evaluate(Some(&d), "", &ctx(&values)).is_valid());
        assert!(!evaluate(Some(&d), "99999", &ctx(&values)).is_valid());
    }
}
