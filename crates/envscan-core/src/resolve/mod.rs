//! Resolution engine.
//!
//! Turns one application's raw definitions into a keyed state map:
//!
//! 1. group definitions by key, in file-read order
//! 2. rank each group by the mode's precedence and pick the effective value
//! 3. validate every key against the full effective map
//! 4. add `MISSING` entries for descriptors that must appear but are absent
//!
//! Validation runs strictly after every effective value is known, so a
//! cross-variable rule sees the same data whatever order keys arrive in.
//! Resolution is a pure function of its inputs: the same definitions always
//! produce an equal `AppEnvState`.

pub mod validate;

use crate::logging::event_names;
use crate::scanner::{AppFileInfo, RawDefinition};
use envscan_common::Mode;
use envscan_model::{
    Deprecation, EffectiveValues, RuleModel, Validation, ValidationContext, VariableDescriptor,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Category given to keys no descriptor declares.
pub const CUSTOM_CATEGORY: &str = "Custom";

const MISSING: &str = "MISSING";

/// Where an effective value comes from.
///
/// Serializes as the file name, or `"MISSING"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    File(String),
    /// No file defines the key but its descriptor demands it.
    Missing,
}

impl Source {
    pub fn is_missing(&self) -> bool {
        matches!(self, Source::Missing)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Source::File(name) => name,
            Source::Missing => MISSING,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(if s == MISSING {
            Source::Missing
        } else {
            Source::File(s)
        })
    }
}

/// Resolved record for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableState {
    pub key: String,
    pub category: String,
    /// Every definition of the key, lowest precedence first.
    pub definitions: Vec<RawDefinition>,
    pub effective_value: String,
    pub effective_source: Source,
    /// More than one definition exists.
    pub is_overridden: bool,
    pub validation: Validation,
}

impl VariableState {
    pub fn is_missing(&self) -> bool {
        self.effective_source.is_missing()
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    /// Definitions shadowed by the effective one.
    pub fn shadowed(&self) -> &[RawDefinition] {
        match self.definitions.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}

/// A deprecated variable that is still set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeprecationNotice {
    pub key: String,
    pub source: String,
    #[serde(flatten)]
    pub deprecation: Deprecation,
}

/// Counts over one application's state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub missing: usize,
    pub overridden: usize,
    pub custom: usize,
    pub deprecated: usize,
}

/// Resolved state of one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEnvState {
    pub app_name: String,
    pub file_path: PathBuf,
    pub mode: Mode,
    pub variables: BTreeMap<String, VariableState>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deprecations: Vec<DeprecationNotice>,
}

impl AppEnvState {
    pub fn get(&self, key: &str) -> Option<&VariableState> {
        self.variables.get(key)
    }

    /// Effective value of `key`, or `""` when unresolved.
    pub fn effective_value(&self, key: &str) -> &str {
        self.variables
            .get(key)
            .map(|s| s.effective_value.as_str())
            .unwrap_or("")
    }

    pub fn is_valid(&self) -> bool {
        self.variables.values().all(VariableState::is_valid)
    }

    /// Keys failing validation, in key order.
    pub fn invalid(&self) -> impl Iterator<Item = &VariableState> {
        self.variables.values().filter(|s| !s.is_valid())
    }

    pub fn summary(&self) -> EnvSummary {
        let mut summary = EnvSummary {
            total: self.variables.len(),
            deprecated: self.deprecations.len(),
            ..EnvSummary::default()
        };
        for state in self.variables.values() {
            if state.is_valid() {
                summary.valid += 1;
            } else {
                summary.invalid += 1;
            }
            if state.is_missing() {
                summary.missing += 1;
            }
            if state.is_overridden {
                summary.overridden += 1;
            }
            if state.category == CUSTOM_CATEGORY {
                summary.custom += 1;
            }
        }
        summary
    }
}

/// Resolves applications against a rule model.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'m> {
    model: &'m RuleModel,
}

impl Resolver<'static> {
    /// Resolver over the built-in catalog.
    pub fn builtin() -> Self {
        Resolver {
            model: RuleModel::builtin(),
        }
    }
}

impl<'m> Resolver<'m> {
    pub fn new(model: &'m RuleModel) -> Self {
        Resolver { model }
    }

    pub fn model(&self) -> &'m RuleModel {
        self.model
    }

    pub fn resolve(&self, app: &AppFileInfo, mode: Mode) -> AppEnvState {
        let grouped = self.group(&app.variables, mode);

        // Phase one: effective values only.
        let mut ranked: BTreeMap<String, Vec<RawDefinition>> = BTreeMap::new();
        let mut effective = EffectiveValues::new();
        for (key, mut definitions) in grouped {
            definitions.sort_by_key(|d| mode.precedence_of(&d.source));
            if let Some(last) = definitions.last() {
                effective.insert(key.clone(), last.value.clone());
            }
            ranked.insert(key, definitions);
        }

        // Phase two: validation against the complete map.
        let ctx = ValidationContext::new(&effective, mode);
        let mut variables = BTreeMap::new();
        let mut deprecations = Vec::new();
        for (key, definitions) in ranked {
            let descriptor = self.model.get(&key);
            let Some(winner) = definitions.last() else {
                continue;
            };
            let effective_value = winner.value.clone();
            let effective_source = Source::File(winner.source.clone());

            if let Some(deprecation) = descriptor.and_then(|d| d.deprecated.clone()) {
                deprecations.push(DeprecationNotice {
                    key: key.clone(),
                    source: winner.source.clone(),
                    deprecation,
                });
            }

            let state = VariableState {
                category: category_of(descriptor),
                is_overridden: definitions.len() > 1,
                validation: validate::evaluate(descriptor, &effective_value, &ctx),
                key: key.clone(),
                definitions,
                effective_value,
                effective_source,
            };
            variables.insert(key, state);
        }

        for descriptor in self.model.iter() {
            if variables.contains_key(&descriptor.name) || !descriptor.must_appear(&ctx) {
                continue;
            }
            variables.insert(descriptor.name.clone(), missing_state(descriptor, &ctx));
        }

        let state = AppEnvState {
            app_name: app.app_name.clone(),
            file_path: app.file_path.clone(),
            mode,
            variables,
            deprecations,
        };

        let summary = state.summary();
        info!(
            event = event_names::RESOLVE_FINISHED,
            app = %state.app_name,
            mode = %mode,
            total = summary.total,
            invalid = summary.invalid,
            missing = summary.missing,
            "Resolved application"
        );
        state
    }

    /// Bucket by key, keeping file-read order and dropping sources the
    /// mode never reads.
    fn group(
        &self,
        definitions: &[RawDefinition],
        mode: Mode,
    ) -> BTreeMap<String, Vec<RawDefinition>> {
        let mut grouped: BTreeMap<String, Vec<RawDefinition>> = BTreeMap::new();
        for definition in definitions {
            if mode.precedence_of(&definition.source).is_none() {
                debug!(
                    key = %definition.key,
                    source = %definition.source,
                    mode = %mode,
                    "Ignoring definition from a file this mode does not read"
                );
                continue;
            }
            grouped
                .entry(definition.key.clone())
                .or_default()
                .push(definition.clone());
        }
        grouped
    }
}

fn category_of(descriptor: Option<&VariableDescriptor>) -> String {
    descriptor
        .map(|d| d.category.clone())
        .unwrap_or_else(|| CUSTOM_CATEGORY.to_string())
}

/// Entry for a descriptor no file defines.
///
/// A synthesized entry always fails, even when the active rule carries no
/// message of its own.
fn missing_state(descriptor: &VariableDescriptor, ctx: &ValidationContext<'_>) -> VariableState {
    let mut validation = validate::evaluate(Some(descriptor), "", ctx);
    if validation.is_valid() {
        validation = Validation::from_issues(missing_issues(descriptor, ctx));
    }
    VariableState {
        key: descriptor.name.clone(),
        category: descriptor.category.clone(),
        definitions: Vec::new(),
        effective_value: String::new(),
        effective_source: Source::Missing,
        is_overridden: false,
        validation,
    }
}

fn missing_issues(descriptor: &VariableDescriptor, ctx: &ValidationContext<'_>) -> Vec<String> {
    let issues: Vec<String> = descriptor
        .contextual_validation()
        .map(|c| c.active_dependencies(ctx))
        .unwrap_or_default()
        .iter()
        .map(|dep| {
            format!(
                "{} is required by {} but missing from your environment files.",
                descriptor.name, dep.variable
            )
        })
        .collect();
    if issues.is_empty() {
        vec![validate::REQUIRED_MISSING.to_string()]
    } else {
        issues
    }
}

/// Resolve `app` against the built-in catalog.
pub fn resolve(app: &AppFileInfo, mode: Mode) -> AppEnvState {
    Resolver::builtin().resolve(app, mode)
}
