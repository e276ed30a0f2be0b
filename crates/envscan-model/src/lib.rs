//! Rule model for environment variables.
//!
//! This crate provides:
//! - `VariableDescriptor`: the static shape and validation contract of one variable
//! - The `Validator` seam and a library of reusable validators
//! - `RuleModel`: a name-indexed registry of descriptors
//! - The built-in catalog for the SaaS starter kit
//! - JSON rule overlays that add or replace descriptors declaratively
//!
//! Descriptors are pure data plus pure functions. Nothing here performs
//! I/O except `RuleOverlay::from_file`.

pub mod catalog;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod overlay;
pub mod registry;
pub mod validation;
pub mod validator;
pub mod validators;

pub use context::{EffectiveValues, ValidationContext};
pub use descriptor::{
    ContextualValidation, Dependency, DescriptorSummary, Deprecation, VariableDescriptor,
    VariableType,
};
pub use error::{RuleError, RuleResult};
pub use overlay::{RequiredWhen, RuleOverlay, RuleSpec};
pub use registry::RuleModel;
pub use validation::{Validation, ValidationIssues};
pub use validator::{BoxedValidator, Condition, Validator};

/// Schema version accepted for rule overlay files.
pub const RULES_SCHEMA_VERSION: &str = "1.0.0";
