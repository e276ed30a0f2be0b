//! The validator seam.
//!
//! Every descriptor-level check, whether a plain format check or a
//! cross-variable rule, is a `Validator`. Dependency predicates are
//! `Condition`s. Both are total, pure functions of their inputs: they
//! report problems through `Validation`, never by panicking.

use crate::context::ValidationContext;
use crate::validation::Validation;

/// Uniform validation interface for descriptor rules.
pub trait Validator: Send + Sync {
    fn evaluate(&self, value: &str, ctx: &ValidationContext<'_>) -> Validation;
}

/// Owned, type-erased validator as stored on descriptors.
pub type BoxedValidator = Box<dyn Validator>;

/// Predicate deciding whether a contextual rule applies.
///
/// `value` is the current effective value of the dependency variable
/// (`""` when unset).
pub trait Condition: Send + Sync {
    fn holds(&self, value: &str, ctx: &ValidationContext<'_>) -> bool;
}

struct FnValidator<F>(F);

impl<F> Validator for FnValidator<F>
where
    F: Fn(&str, &ValidationContext<'_>) -> Validation + Send + Sync,
{
    fn evaluate(&self, value: &str, ctx: &ValidationContext<'_>) -> Validation {
        (self.0)(value, ctx)
    }
}

struct FnCondition<F>(F);

impl<F> Condition for FnCondition<F>
where
    F: Fn(&str, &ValidationContext<'_>) -> bool + Send + Sync,
{
    fn holds(&self, value: &str, ctx: &ValidationContext<'_>) -> bool {
        (self.0)(value, ctx)
    }
}

/// Wrap a closure as a validator.
pub fn from_fn<F>(f: F) -> BoxedValidator
where
    F: Fn(&str, &ValidationContext<'_>) -> Validation + Send + Sync + 'static,
{
    Box::new(FnValidator(f))
}

/// Wrap a closure as a dependency condition.
pub fn condition_fn<F>(f: F) -> Box<dyn Condition>
where
    F: Fn(&str, &ValidationContext<'_>) -> bool + Send + Sync + 'static,
{
    Box::new(FnCondition(f))
}
