//! JSON rule overlays.
//!
//! An overlay adds descriptors to the built-in catalog, or replaces
//! catalog entries of the same name:
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "variables": [
//!     {
//!       "name": "ANALYTICS_KEY",
//!       "category": "Analytics",
//!       "type": "string",
//!       "secret": true,
//!       "starts_with": ["an_"],
//!       "required_when": {"variable": "ANALYTICS_PROVIDER", "equals": "acme"}
//!     }
//!   ]
//! }
//! ```

use crate::descriptor::{ContextualValidation, Dependency, VariableDescriptor, VariableType};
use crate::error::{RuleError, RuleResult};
use crate::validation::Validation;
use crate::validator::{from_fn, BoxedValidator};
use crate::{validators, RULES_SCHEMA_VERSION};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static VARIABLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// A rule overlay file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOverlay {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub variables: Vec<RuleSpec>,
}

/// Declarative form of one descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub name: String,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default, rename = "type")]
    pub var_type: VariableType,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub secret: bool,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub enum_values: Vec<String>,

    /// Regular expression the value must match.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Accepted value prefixes.
    #[serde(default)]
    pub starts_with: Vec<String>,

    #[serde(default)]
    pub deprecated: Option<DeprecatedSpec>,

    #[serde(default)]
    pub required_when: Option<RequiredWhen>,
}

fn default_category() -> String {
    "Custom".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeprecatedSpec {
    pub reason: String,
    #[serde(default)]
    pub alternative: Option<String>,
}

/// Condition under which a variable becomes required.
///
/// With neither `equals` nor `one_of`, any non-empty value of `variable`
/// activates the rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequiredWhen {
    pub variable: String,

    #[serde(default)]
    pub equals: Option<String>,

    #[serde(default)]
    pub one_of: Option<Vec<String>>,

    #[serde(default)]
    pub message: Option<String>,
}

impl RuleOverlay {
    /// Load an overlay from disk.
    pub fn from_file(path: &Path) -> RuleResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_json(&content)
    }

    /// Parse an overlay and check its schema version.
    pub fn parse_json(content: &str) -> RuleResult<Self> {
        let overlay: RuleOverlay = serde_json::from_str(content)?;
        overlay.check_version()?;
        Ok(overlay)
    }

    fn check_version(&self) -> RuleResult<()> {
        let major = |v: &str| v.split('.').next().unwrap_or_default().to_string();
        if major(&self.schema_version) != major(RULES_SCHEMA_VERSION) {
            return Err(RuleError::VersionMismatch {
                expected: RULES_SCHEMA_VERSION.to_string(),
                actual: self.schema_version.clone(),
            });
        }
        Ok(())
    }

    /// Turn every rule entry into a descriptor.
    pub fn into_descriptors(self) -> RuleResult<Vec<VariableDescriptor>> {
        self.variables
            .into_iter()
            .map(RuleSpec::into_descriptor)
            .collect()
    }
}

impl RuleSpec {
    pub fn into_descriptor(self) -> RuleResult<VariableDescriptor> {
        if !VARIABLE_NAME.is_match(&self.name) {
            return Err(RuleError::InvalidValue {
                field: "name".to_string(),
                message: format!("'{}' is not a valid environment variable name", self.name),
            });
        }
        if self.var_type == VariableType::Enum && self.enum_values.is_empty() {
            return Err(RuleError::InvalidValue {
                field: format!("{}.enum_values", self.name),
                message: "enum variables need at least one value".to_string(),
            });
        }

        let validator = self.build_validator()?;

        let mut descriptor = VariableDescriptor::new(&self.name, &self.category, self.var_type)
            .enum_values(self.enum_values.iter().cloned());
        if let Some(description) = &self.description {
            descriptor = descriptor.describe(description);
        }
        if self.secret {
            descriptor = descriptor.secret();
        }
        if self.required {
            descriptor = descriptor.required();
        }
        if let Some(deprecated) = &self.deprecated {
            descriptor = descriptor.deprecated(&deprecated.reason, deprecated.alternative.as_deref());
        }

        descriptor = match self.required_when {
            Some(when) => {
                let dependency = when.into_dependency(&self.name)?;
                let validator =
                    validator.unwrap_or_else(|| from_fn(|_, _| Validation::valid()));
                descriptor.contextual(ContextualValidation::new(vec![dependency], validator))
            }
            None => match validator {
                Some(v) => descriptor.validate(v),
                None => descriptor,
            },
        };

        Ok(descriptor)
    }

    fn build_validator(&self) -> RuleResult<Option<BoxedValidator>> {
        let mut parts = Vec::new();
        if let Some(v) = validators::for_type(self.var_type, &self.enum_values) {
            parts.push(v);
        }
        if let Some(pattern) = &self.pattern {
            let v = validators::matches(pattern, format!("Must match pattern {}", pattern))
                .map_err(|e| RuleError::InvalidPattern {
                    variable: self.name.clone(),
                    message: e.to_string(),
                })?;
            parts.push(v);
        }
        if !self.starts_with.is_empty() {
            let prefixes: Vec<&str> = self.starts_with.iter().map(String::as_str).collect();
            parts.push(validators::starts_with(&prefixes, &self.name));
        }

        Ok(match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(validators::all(parts)),
        })
    }
}

impl RequiredWhen {
    fn into_dependency(self, dependent: &str) -> RuleResult<Dependency> {
        if !VARIABLE_NAME.is_match(&self.variable) {
            return Err(RuleError::InvalidValue {
                field: format!("{}.required_when.variable", dependent),
                message: format!("'{}' is not a valid environment variable name", self.variable),
            });
        }

        match (self.equals, self.one_of) {
            (Some(_), Some(_)) => Err(RuleError::InvalidValue {
                field: format!("{}.required_when", dependent),
                message: "use either 'equals' or 'one_of', not both".to_string(),
            }),
            (Some(expected), None) => {
                let message = self.message.unwrap_or_else(|| {
                    format!(
                        "{} is required when {} is set to '{}'.",
                        dependent, self.variable, expected
                    )
                });
                Ok(Dependency::when_equals(self.variable, expected, message))
            }
            (None, Some(expected)) => {
                if expected.is_empty() {
                    return Err(RuleError::InvalidValue {
                        field: format!("{}.required_when.one_of", dependent),
                        message: "must list at least one value".to_string(),
                    });
                }
                let message = self.message.unwrap_or_else(|| {
                    format!(
                        "{} is required when {} is one of: {}.",
                        dependent,
                        self.variable,
                        expected.join(", ")
                    )
                });
                Ok(Dependency::when_one_of(self.variable, expected, message))
            }
            (None, None) => {
                let message = self.message.unwrap_or_else(|| {
                    format!("{} is required when {} is set.", dependent, self.variable)
                });
                Ok(Dependency::when_set(self.variable, message))
            }
        }
    }
}
