//! Variable descriptors.
//!
//! A descriptor declares, for one known environment variable, its shape
//! (type, enum values, secrecy), whether it must be present, whether it is
//! deprecated, and up to two validation tiers:
//!
//! - an unconditional validator that runs whenever a value is present
//! - a contextual validation that only applies while at least one of its
//!   dependencies is active
//!
//! Descriptors are built once and never mutated afterwards.

use crate::context::ValidationContext;
use crate::validation::Validation;
use crate::validator::{condition_fn, BoxedValidator, Condition};
use serde::{Deserialize, Serialize};

/// Value type of a variable, used for display and for overlay-implied checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariableType {
    /// Short single-line string.
    #[default]
    String,
    /// Long free-form text.
    LongString,
    Number,
    Boolean,
    /// One of a fixed list of values.
    Enum,
    Url,
    Email,
}

impl std::fmt::Display for VariableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VariableType::String => "string",
            VariableType::LongString => "long-string",
            VariableType::Number => "number",
            VariableType::Boolean => "boolean",
            VariableType::Enum => "enum",
            VariableType::Url => "url",
            VariableType::Email => "email",
        };
        f.write_str(s)
    }
}

/// Deprecation notice for a variable that should no longer be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
}

/// One dependency of a contextual rule.
///
/// The rule applies while `condition` holds for the dependency's
/// effective value. `message` explains what is missing when the rule
/// applies and the dependent variable is empty.
pub struct Dependency {
    pub variable: String,
    pub message: String,
    condition: Box<dyn Condition>,
}

impl Dependency {
    pub fn new<F>(variable: impl Into<String>, message: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&str, &ValidationContext<'_>) -> bool + Send + Sync + 'static,
    {
        Dependency {
            variable: variable.into(),
            message: message.into(),
            condition: condition_fn(condition),
        }
    }

    /// Active when the dependency's value equals `expected`.
    pub fn when_equals(
        variable: impl Into<String>,
        expected: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let expected = expected.into();
        Dependency::new(variable, message, move |value, _| value == expected)
    }

    /// Active when the dependency's value is any of `expected`.
    pub fn when_one_of(
        variable: impl Into<String>,
        expected: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        Dependency::new(variable, message, move |value, _| {
            expected.iter().any(|e| e == value)
        })
    }

    /// Active when the dependency has any non-empty value.
    pub fn when_set(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Dependency::new(variable, message, |value, _| !value.is_empty())
    }

    /// Evaluate the condition against the dependency's current value.
    pub fn is_active(&self, ctx: &ValidationContext<'_>) -> bool {
        self.condition.holds(ctx.value(&self.variable), ctx)
    }
}

impl std::fmt::Debug for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("variable", &self.variable)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A rule that only applies when another variable makes it relevant.
///
/// The rule is active when **any** dependency is active. Rules that need
/// several variables to agree must encode that inside one condition.
pub struct ContextualValidation {
    pub dependencies: Vec<Dependency>,
    validate: BoxedValidator,
}

impl ContextualValidation {
    pub fn new(dependencies: Vec<Dependency>, validate: BoxedValidator) -> Self {
        ContextualValidation {
            dependencies,
            validate,
        }
    }

    /// Dependencies whose condition currently holds, in declaration order.
    pub fn active_dependencies<'d>(&'d self, ctx: &ValidationContext<'_>) -> Vec<&'d Dependency> {
        self.dependencies
            .iter()
            .filter(|dep| dep.is_active(ctx))
            .collect()
    }

    pub fn is_active(&self, ctx: &ValidationContext<'_>) -> bool {
        self.dependencies.iter().any(|dep| dep.is_active(ctx))
    }

    /// Run the rule's validator on a present value.
    pub fn validate(&self, value: &str, ctx: &ValidationContext<'_>) -> Validation {
        self.validate.evaluate(value, ctx)
    }
}

impl std::fmt::Debug for ContextualValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextualValidation")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Static description of one known environment variable.
pub struct VariableDescriptor {
    pub name: String,
    pub category: String,
    pub var_type: VariableType,
    pub description: Option<String>,
    pub secret: bool,
    pub required: bool,
    pub enum_values: Vec<String>,
    pub deprecated: Option<Deprecation>,
    validate: Option<BoxedValidator>,
    contextual: Option<ContextualValidation>,
}

impl VariableDescriptor {
    pub fn new(name: impl Into<String>, category: impl Into<String>, var_type: VariableType) -> Self {
        VariableDescriptor {
            name: name.into(),
            category: category.into(),
            var_type,
            description: None,
            secret: false,
            required: false,
            enum_values: Vec::new(),
            deprecated: None,
            validate: None,
            contextual: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>, alternative: Option<&str>) -> Self {
        self.deprecated = Some(Deprecation {
            reason: reason.into(),
            alternative: alternative.map(str::to_string),
        });
        self
    }

    pub fn validate(mut self, validator: BoxedValidator) -> Self {
        self.validate = Some(validator);
        self
    }

    pub fn contextual(mut self, contextual: ContextualValidation) -> Self {
        self.contextual = Some(contextual);
        self
    }

    /// The unconditional validator, if declared.
    pub fn validator(&self) -> Option<&dyn crate::Validator> {
        self.validate.as_deref()
    }

    pub fn contextual_validation(&self) -> Option<&ContextualValidation> {
        self.contextual.as_ref()
    }

    /// Whether the resolved state must carry this key even when no file defines it.
    ///
    /// Required keys always do. Contextual keys only while their rule is active.
    pub fn must_appear(&self, ctx: &ValidationContext<'_>) -> bool {
        self.required
            || self
                .contextual
                .as_ref()
                .is_some_and(|c| c.is_active(ctx))
    }

    /// Names of the variables this descriptor's contextual rule reads.
    pub fn dependency_names(&self) -> Vec<&str> {
        self.contextual
            .as_ref()
            .map(|c| c.dependencies.iter().map(|d| d.variable.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> DescriptorSummary {
        DescriptorSummary {
            name: self.name.clone(),
            category: self.category.clone(),
            var_type: self.var_type,
            description: self.description.clone(),
            secret: self.secret,
            required: self.required,
            enum_values: self.enum_values.clone(),
            deprecated: self.deprecated.clone(),
            has_validator: self.validate.is_some(),
            depends_on: self
                .dependency_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl std::fmt::Debug for VariableDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableDescriptor")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("var_type", &self.var_type)
            .field("secret", &self.secret)
            .field("required", &self.required)
            .field("enum_values", &self.enum_values)
            .field("deprecated", &self.deprecated)
            .field("has_validator", &self.validate.is_some())
            .field("contextual", &self.contextual)
            .finish()
    }
}

/// Serializable view of a descriptor, without its closures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorSummary {
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub secret: bool,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
    pub has_validator: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EffectiveValues;
    use crate::validator::from_fn;
    use envscan_common::Mode;

    fn ctx_with<'a>(values: &'a EffectiveValues) -> ValidationContext<'a> {
        ValidationContext::new(values, Mode::Development)
    }

    #[test]
    fn test_builder_defaults() {
        let d = VariableDescriptor::new("FOO", "General", VariableType::String);
        assert!(!d.secret);
        assert!(!d.required);
        assert!(d.validator().is_none());
        assert!(d.contextual_validation().is_none());
        let values = EffectiveValues::new();
        assert!(!d.must_appear(&ctx_with(&values)));
        assert!(d.required().must_appear(&ctx_with(&values)));
    }

    #[test]
    fn test_dependency_when_equals() {
        let dep = Dependency::when_equals("PROVIDER", "stripe", "needs key");
        let mut values = EffectiveValues::new();
        values.insert("PROVIDER".into(), "stripe".into());
        assert!(dep.is_active(&ctx_with(&values)));

        values.insert("PROVIDER".into(), "lemon-squeezy".into());
        assert!(!dep.is_active(&ctx_with(&values)));
    }

    #[test]
    fn test_dependency_when_set_on_missing_variable() {
        let dep = Dependency::when_set("SITE_KEY", "needs secret");
        let values = EffectiveValues::new();
        assert!(!dep.is_active(&ctx_with(&values)));
    }

    #[test]
    fn test_contextual_is_active_any_dependency() {
        let contextual = ContextualValidation::new(
            vec![
                Dependency::when_equals("A", "1", "a"),
                Dependency::when_equals("B", "1", "b"),
            ],
            from_fn(|_, _| Validation::valid()),
        );
        let mut values = EffectiveValues::new();
        values.insert("B".into(), "1".into());
        let ctx = ctx_with(&values);
        assert!(contextual.is_active(&ctx));
        let active: Vec<&str> = contextual
            .active_dependencies(&ctx)
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(active, vec!["b"]);
    }

    #[test]
    fn test_summary_lists_dependencies() {
        let d = VariableDescriptor::new("KEY", "Billing", VariableType::String)
            .secret()
            .contextual(ContextualValidation::new(
                vec![Dependency::when_set("PROVIDER", "x")],
                from_fn(|_, _| Validation::valid()),
            ));
        let summary = d.summary();
        assert!(summary.secret);
        let mut values = EffectiveValues::new();
        assert!(!d.must_appear(&ctx_with(&values)));
        values.insert("PROVIDER".into(), "paddle".into());
        assert!(d.must_appear(&ctx_with(&values)));
        assert_eq!(summary.depends_on, vec!["PROVIDER".to_string()]);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "string");
    }
}
